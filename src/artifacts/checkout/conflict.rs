use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};

/// Ways an update of the working tree could lose local work
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConflictType {
    /// Tracked file with staged or unstaged edits
    StaleFile,
    /// Directory holding untracked files where a file must go
    StaleDirectory,
    UntrackedOverwritten,
    UntrackedRemoved,
}

impl ConflictType {
    pub fn description(&self) -> &'static str {
        match self {
            ConflictType::StaleFile => "local changes would be overwritten",
            ConflictType::StaleDirectory => "untracked files in these directories would be lost",
            ConflictType::UntrackedOverwritten => "untracked files would be overwritten",
            ConflictType::UntrackedRemoved => "untracked files would be removed",
        }
    }

    pub fn get_conflict_type(
        stat: Option<&EntryMetadata>,
        entry: Option<&IndexEntry>,
        new_entry: Option<&DatabaseEntry>,
    ) -> ConflictType {
        if entry.is_some() {
            ConflictType::StaleFile
        } else if let Some(stat) = stat
            && stat.mode.is_tree()
        {
            ConflictType::StaleDirectory
        } else if new_entry.is_some() {
            ConflictType::UntrackedOverwritten
        } else {
            ConflictType::UntrackedRemoved
        }
    }
}
