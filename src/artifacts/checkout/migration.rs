use crate::areas::database::{Database, TreeListing};
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::ConflictType;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::tree_diff::{ChangeSet, TreeChangeType, diff_listings};
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use crate::errors::VitError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub type ConflictsSet = BTreeMap<ConflictType, BTreeSet<PathBuf>>;

/// Planned update of the working tree and index
///
/// Deletions are applied before writes, so a file can replace a directory (and the
/// reverse) within one migration.
pub struct Migration<'r> {
    workspace: &'r Workspace,
    database: &'r Database,
    changes: ChangeSet,
    conflicts: ConflictsSet,
}

impl<'r> Migration<'r> {
    pub fn new(workspace: &'r Workspace, database: &'r Database, changes: ChangeSet) -> Self {
        Migration {
            workspace,
            database,
            changes,
            conflicts: ConflictsSet::new(),
        }
    }

    /// Migration that makes index and working tree match `target` whatever they hold
    ///
    /// Tracked files missing from `target` are deleted; tracked files with local edits are
    /// rewritten. Untracked files are left alone.
    pub fn restore(
        workspace: &'r Workspace,
        database: &'r Database,
        index: &Index,
        target: &TreeListing,
    ) -> anyhow::Result<Self> {
        let inspector = Inspector::new(workspace);
        let mut changes = diff_listings(&index.listing(), target);

        for (path, entry) in target {
            if changes.contains_key(path) {
                continue;
            }
            let Some(index_entry) = index.entry_by_path(path) else {
                continue;
            };

            let stat = workspace.try_stat_file(path)?;
            if inspector.check_index_against_workspace(index_entry, stat.as_ref())?
                != WorkspaceChangeType::None
            {
                changes.insert(
                    path.clone(),
                    TreeChangeType::Modified {
                        old: entry.clone(),
                        new: entry.clone(),
                    },
                );
            }
        }

        Ok(Self::new(workspace, database, changes))
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn conflicts(&self) -> &ConflictsSet {
        &self.conflicts
    }

    /// Refuse with `CheckoutConflict` when applying would destroy local work
    pub fn check_conflicts(&mut self, index: &Index) -> anyhow::Result<()> {
        let inspector = Inspector::new(self.workspace);

        let changes = self
            .changes
            .iter()
            .map(|(path, change)| (path.clone(), change.clone()))
            .collect::<Vec<_>>();
        for (path, change) in &changes {
            self.check_for_conflict(path, change, index, &inspector)?;
        }

        if self.conflicts.is_empty() {
            return Ok(());
        }

        for (conflict_type, paths) in &self.conflicts {
            tracing::debug!(
                paths = ?paths,
                "{}",
                conflict_type.description()
            );
        }

        let paths = self
            .conflicts
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>();
        Err(VitError::CheckoutConflict(paths.into_iter().collect()).into())
    }

    fn check_for_conflict(
        &mut self,
        path: &Path,
        change: &TreeChangeType,
        index: &Index,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<()> {
        let entry = index.entry_by_path(path);
        let (old_entry, new_entry) = (change.old_entry(), change.new_entry());

        if Self::index_differs_from_trees(inspector, entry, old_entry, new_entry) {
            self.record_conflict(ConflictType::StaleFile, path);
            return Ok(());
        }

        let stat = self.workspace.try_stat_file(path)?;
        let conflict_type = ConflictType::get_conflict_type(stat.as_ref(), entry, new_entry);

        match (&stat, entry) {
            (Some(stat), _) if stat.mode.is_tree() => {
                if inspector.has_untracked_files(path, index)? {
                    self.record_conflict(conflict_type, path);
                }
            }
            (Some(stat), Some(entry)) => {
                if inspector.check_index_against_workspace(entry, Some(stat))?
                    != WorkspaceChangeType::None
                {
                    self.record_conflict(conflict_type, path);
                }
            }
            (Some(_), None) => {
                let on_disk = self.workspace.parse_blob(path)?.object_id()?;
                if new_entry.map(|new| &new.oid) != Some(&on_disk) {
                    self.record_conflict(conflict_type, path);
                }
            }
            (None, _) => {
                if new_entry.is_some()
                    && let Some(parent) = self.untracked_parent(path, index)
                {
                    self.record_conflict(ConflictType::UntrackedOverwritten, &parent);
                }
            }
        }

        Ok(())
    }

    fn record_conflict(&mut self, conflict_type: ConflictType, path: &Path) {
        self.conflicts
            .entry(conflict_type)
            .or_default()
            .insert(path.to_path_buf());
    }

    /// Untracked file standing where one of the parent directories of `path` must go
    fn untracked_parent(&self, path: &Path, index: &Index) -> Option<PathBuf> {
        path.ancestors()
            .skip(1)
            .filter(|parent| !parent.as_os_str().is_empty())
            .find(|parent| {
                self.workspace.path().join(parent).is_file()
                    && index.entry_by_path(parent).is_none()
            })
            .map(Path::to_path_buf)
    }

    /// The index holds a version that is neither the one being replaced nor the target
    fn index_differs_from_trees(
        inspector: &Inspector<'_>,
        index_entry: Option<&IndexEntry>,
        old_entry: Option<&DatabaseEntry>,
        new_entry: Option<&DatabaseEntry>,
    ) -> bool {
        inspector.check_index_against_head_tree(index_entry, old_entry) != IndexChangeType::None
            && inspector.check_index_against_head_tree(index_entry, new_entry)
                != IndexChangeType::None
    }

    /// Write the planned changes into the working tree and `index`
    ///
    /// The caller persists the index.
    pub fn apply(self, index: &mut Index) -> anyhow::Result<()> {
        for (path, change) in &self.changes {
            if let TreeChangeType::Deleted(_) = change {
                self.workspace.remove_file(path)?;
                index.remove(path);
            }
        }

        for (path, change) in &self.changes {
            if let Some(entry) = change.new_entry() {
                let blob = self.database.parse_object_as_blob(&entry.oid)?;
                self.workspace.write_file(path, blob.content(), entry.mode)?;

                let stat = self.workspace.stat_file(path)?;
                index.add(IndexEntry::new(path.clone(), entry.oid.clone(), stat));
            }
        }

        tracing::debug!(changes = self.changes.len(), "applied migration");

        Ok(())
    }
}
