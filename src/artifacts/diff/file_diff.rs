use crate::areas::database::TreeListing;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::hunk::{HUNK_CONTEXT, Hunk};
use crate::artifacts::diff::myers::{DiffAlgorithm, MyersDiff};
use crate::artifacts::diff::tree_diff::{TreeChangeType, diff_listings};
use crate::artifacts::objects::object_id::ObjectId;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSide {
    Commit(ObjectId),
    Index,
    Workspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDiffKind {
    Added,
    Deleted,
    Modified,
}

impl FileDiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileDiffKind::Added => "added",
            FileDiffKind::Deleted => "deleted",
            FileDiffKind::Modified => "modified",
        }
    }
}

/// Line-level difference of a single file between two sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub kind: FileDiffKind,
    pub hunks: Vec<Hunk>,
}

impl Display for FileDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = self.path.display();
        writeln!(f, "diff --vit a/{path} b/{path}")?;

        match self.kind {
            FileDiffKind::Added => writeln!(f, "--- /dev/null\n+++ b/{path}")?,
            FileDiffKind::Deleted => writeln!(f, "--- a/{path}\n+++ /dev/null")?,
            FileDiffKind::Modified => writeln!(f, "--- a/{path}\n+++ b/{path}")?,
        }

        for hunk in &self.hunks {
            write!(f, "{hunk}")?;
        }

        Ok(())
    }
}

/// Compare two flattened sides path by path
///
/// Paths whose blob ids agree are skipped before any content is read; the
/// loaders are only called for the sides that actually differ.
pub fn diff_snapshots<O, N>(
    old: &TreeListing,
    new: &TreeListing,
    mut old_text: O,
    mut new_text: N,
) -> anyhow::Result<Vec<FileDiff>>
where
    O: FnMut(&Path, &DatabaseEntry) -> anyhow::Result<String>,
    N: FnMut(&Path, &DatabaseEntry) -> anyhow::Result<String>,
{
    let mut diffs = Vec::new();

    for (path, change) in diff_listings(old, new) {
        let (kind, before, after) = match &change {
            TreeChangeType::Added(entry) => {
                (FileDiffKind::Added, String::new(), new_text(&path, entry)?)
            }
            TreeChangeType::Deleted(entry) => {
                (FileDiffKind::Deleted, old_text(&path, entry)?, String::new())
            }
            TreeChangeType::Modified { old, new } if old.oid == new.oid => continue,
            TreeChangeType::Modified { old, new } => (
                FileDiffKind::Modified,
                old_text(&path, old)?,
                new_text(&path, new)?,
            ),
        };

        diffs.push(FileDiff {
            path,
            kind,
            hunks: diff_text(&before, &after),
        });
    }

    Ok(diffs)
}

/// Hunks turning `before` into `after`, compared line by line
pub fn diff_text(before: &str, after: &str) -> Vec<Hunk> {
    let old_lines = before.lines().map(str::to_string).collect::<Vec<_>>();
    let new_lines = after.lines().map(str::to_string).collect::<Vec<_>>();

    Hunk::build(&MyersDiff::new(&old_lines, &new_lines).diff(), HUNK_CONTEXT)
}
