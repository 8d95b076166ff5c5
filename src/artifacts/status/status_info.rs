use crate::areas::database::TreeListing;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Start of the block a conflicted merge leaves in a file
pub const CONFLICT_MARKER: &str = "<<<<<<< HEAD";

/// HEAD / index / workspace comparison
///
/// A path can be staged and still carry further unstaged edits, so it may appear in both
/// `index_changes` and `workspace_changes`. Untracked paths appear nowhere else; an
/// untracked directory is reported once, with a trailing `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub index_changes: BTreeMap<PathBuf, IndexChangeType>,
    pub workspace_changes: BTreeMap<PathBuf, WorkspaceChangeType>,
    pub untracked: BTreeSet<PathBuf>,
    /// Tracked files still holding conflict markers while a merge is in progress
    pub conflicted: BTreeSet<PathBuf>,
}

impl StatusInfo {
    /// No staged or unstaged change to a tracked file; untracked files do not count
    pub fn is_clean(&self) -> bool {
        self.index_changes.is_empty() && self.workspace_changes.is_empty()
    }

    /// Tracked paths with any change, sorted
    pub fn changed_paths(&self) -> Vec<PathBuf> {
        self.index_changes
            .keys()
            .chain(self.workspace_changes.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Two-column `XY path` lines, untracked entries last as `?? path`
    pub fn porcelain(&self) -> Vec<String> {
        let mut lines = self
            .changed_paths()
            .into_iter()
            .map(|path| {
                let staged = self.index_changes.get(&path).copied().unwrap_or_default();
                let unstaged = self
                    .workspace_changes
                    .get(&path)
                    .copied()
                    .unwrap_or_default();
                format!(
                    "{}{} {}",
                    staged.status_char(),
                    unstaged.status_char(),
                    path.display()
                )
            })
            .collect::<Vec<_>>();

        lines.extend(
            self.untracked
                .iter()
                .map(|path| format!("?? {}", path.display())),
        );

        lines
    }
}

#[derive(new)]
pub struct Status<'r> {
    workspace: &'r Workspace,
}

impl<'r> Status<'r> {
    /// Compare the three areas
    ///
    /// Entries whose content turned out unchanged get fresh stat data in `index`, so the
    /// caller should write the index back when it reports changes.
    pub fn collect(
        &self,
        index: &mut Index,
        head_tree: &TreeListing,
    ) -> anyhow::Result<StatusInfo> {
        let inspector = Inspector::new(self.workspace);
        let mut stats = BTreeMap::new();
        let mut status = StatusInfo::default();

        self.scan_workspace(Path::new(""), index, &mut stats, &mut status.untracked)?;

        let entries = index.entries().cloned().collect::<Vec<_>>();
        for entry in entries {
            let stat = stats.get(&entry.name);
            match inspector.check_index_against_workspace(&entry, stat)? {
                WorkspaceChangeType::None => {
                    if let Some(stat) = stat
                        && !entry.times_match(stat)
                    {
                        index.update_entry_stat(&entry.name, stat.clone());
                    }
                }
                change => {
                    status.workspace_changes.insert(entry.name.clone(), change);
                }
            }

            let change =
                inspector.check_index_against_head_tree(Some(&entry), head_tree.get(&entry.name));
            if change != IndexChangeType::None {
                status.index_changes.insert(entry.name.clone(), change);
            }
        }

        for path in head_tree.keys() {
            if index.entry_by_path(path).is_none() {
                status
                    .index_changes
                    .insert(path.clone(), IndexChangeType::Deleted);
            }
        }

        Ok(status)
    }

    /// Tracked files whose working copy still carries a conflict block
    pub fn conflicted_files(&self, index: &Index) -> BTreeSet<PathBuf> {
        index
            .entries()
            .filter(|entry| {
                self.workspace
                    .read_file(&entry.name)
                    .map(|content| {
                        content
                            .split(|byte| *byte == b'\n')
                            .any(|line| line == CONFLICT_MARKER.as_bytes())
                    })
                    .unwrap_or(false)
            })
            .map(|entry| entry.name.clone())
            .collect()
    }

    fn scan_workspace(
        &self,
        dir: &Path,
        index: &Index,
        stats: &mut BTreeMap<PathBuf, EntryMetadata>,
        untracked: &mut BTreeSet<PathBuf>,
    ) -> anyhow::Result<()> {
        for path in self.workspace.list_dir(dir)? {
            let is_dir = self.workspace.is_dir(&path);

            if index.is_directly_tracked(&path) {
                match is_dir {
                    true => self.scan_workspace(&path, index, stats, untracked)?,
                    false => {
                        let stat = self.workspace.stat_file(&path)?;
                        stats.insert(path, stat);
                    }
                }
            } else if self.workspace.contains_files(&path) {
                let mut path = path;
                if is_dir {
                    path.push("");
                }
                untracked.insert(path);
            }
        }

        Ok(())
    }
}
