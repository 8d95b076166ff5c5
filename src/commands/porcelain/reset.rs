use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VitError;
use std::path::{Path, PathBuf};

fn is_under(path: &Path, prefix: &Path) -> bool {
    prefix.as_os_str().is_empty() || prefix == Path::new(".") || path.starts_with(prefix)
}

impl Repository {
    /// Unstage paths: their index entries go back to HEAD's versions
    ///
    /// Entries HEAD does not have are dropped from the index. The working tree is not
    /// touched. Returns the paths whose entries changed.
    pub async fn reset_files(&mut self, paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
        let head_listing = self.head_listing()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let mut reset = Vec::new();

        for prefix in paths {
            let staged = index.entries_under_path(prefix);
            let committed = head_listing
                .iter()
                .filter(|(path, _)| is_under(path, prefix))
                .collect::<Vec<_>>();

            if staged.is_empty() && committed.is_empty() {
                return Err(VitError::PathNotFound(prefix.clone()).into());
            }

            for path in staged {
                if !head_listing.contains_key(&path) {
                    index.remove(&path);
                    reset.push(path);
                }
            }

            for (path, entry) in committed {
                let unchanged = index
                    .entry_by_path(path)
                    .is_some_and(|staged| staged.to_database_entry() == *entry);
                if unchanged {
                    continue;
                }

                index.add(IndexEntry::from_database_entry(path.clone(), entry));
                reset.push(path.clone());
            }
        }

        if index.is_changed() {
            index.write_updates()?;
        }
        reset.sort();
        reset.dedup();

        Ok(reset)
    }

    /// Move HEAD to a commit and make index and working tree match it
    ///
    /// Local changes to tracked files are discarded; untracked files stay. Any merge in
    /// progress is abandoned.
    pub async fn reset_hard(&mut self, revision: &str) -> anyhow::Result<ObjectId> {
        let target = Revision::try_parse(revision)?.resolve(self)?;
        let previous = self.head_commit()?;
        let target_listing = self.database().load_tree_entries(Some(&target))?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let migration =
            Migration::restore(self.workspace(), self.database(), &index, &target_listing)?;
        migration.apply(&mut index)?;
        index.write_updates()?;

        self.advance_head(previous.as_ref(), &target)?;
        self.refs().clear_merge_state()?;
        tracing::debug!(commit = %target, "hard reset");

        Ok(target)
    }
}
