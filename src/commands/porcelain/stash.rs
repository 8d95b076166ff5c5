use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::stash::stash_entry::StashEntry;
use crate::artifacts::stash::stash_label;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::commands::porcelain::commit::resolve_author;
use crate::errors::VitError;

impl Repository {
    /// Put staged and unstaged changes to tracked files aside and go back to HEAD
    ///
    /// The snapshot commit holds every tracked file as it is in the working tree, with
    /// the HEAD commit as its only parent. Untracked files are neither saved nor touched.
    /// When the entry cannot be recorded, the working tree and index are left as they were.
    pub async fn stash_save(
        &mut self,
        message: Option<&str>,
        author: Option<&str>,
    ) -> anyhow::Result<StashEntry> {
        let parent = self.require_head_commit()?;
        let author = resolve_author(author)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let status = self.collect_status(&mut index)?;
        if status.is_clean() {
            return Err(VitError::NothingToStash.into());
        }

        let mut snapshot = index.listing();
        for (path, change) in &status.workspace_changes {
            match change {
                WorkspaceChangeType::Deleted => {
                    snapshot.remove(path);
                }
                WorkspaceChangeType::Modified => {
                    let blob_id = self.database().store(&self.workspace().parse_blob(path)?)?;
                    let stat = self.workspace().stat_file(path)?;
                    snapshot.insert(path.clone(), DatabaseEntry::new(blob_id, stat.mode));
                }
                WorkspaceChangeType::None => {}
            }
        }

        let parent_commit = self.database().parse_object_as_commit(&parent)?;
        let message = match message.map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => StashEntry::default_message(
                self.current_branch()?.as_ref().map(AsRef::as_ref),
                &parent,
                &parent_commit.short_message(),
            ),
        };

        let identity = author.display_name();
        let timestamp = author.timestamp();
        let snapshot_id = self.write_commit(vec![parent.clone()], &snapshot, author, &message)?;

        let head_listing = self.database().load_tree_entries(Some(&parent))?;
        let migration =
            Migration::restore(self.workspace(), self.database(), &index, &head_listing)?;

        // The entry is recorded before the working tree is touched
        let entry = self.stash().push(StashEntry::new(
            message,
            identity,
            timestamp,
            parent,
            snapshot_id,
        ))?;

        migration.apply(&mut index)?;
        index.write_updates()?;

        Ok(entry)
    }

    pub fn stash_list(&self) -> anyhow::Result<Vec<StashEntry>> {
        self.stash().list()
    }

    /// Replay a stash entry onto HEAD, keeping the entry
    ///
    /// The entry's parent is the merge base, so changes made on HEAD since the stash was
    /// saved are kept and overlapping edits conflict with `stash@{n}` as the label.
    pub async fn stash_apply(&mut self, stash_index: usize) -> anyhow::Result<StashEntry> {
        let entry = self.stash().get(stash_index)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        self.ensure_clean(&mut index)?;

        let base = self.database().load_tree_entries(Some(&entry.parent))?;
        let ours = self.head_listing()?;
        let theirs = self.database().load_tree_entries(Some(&entry.snapshot))?;

        let resolution =
            self.apply_three_way(&mut index, &base, &ours, &theirs, &stash_label(stash_index))?;
        if !resolution.is_clean() {
            return Err(VitError::MergeConflict(resolution.conflicted_paths()).into());
        }

        Ok(entry)
    }

    /// Apply a stash entry and drop it when it applied cleanly
    pub async fn stash_pop(&mut self, stash_index: usize) -> anyhow::Result<StashEntry> {
        self.stash_apply(stash_index).await?;
        self.stash().remove(stash_index)
    }

    pub fn stash_drop(&mut self, stash_index: usize) -> anyhow::Result<StashEntry> {
        self.stash().remove(stash_index)
    }

    /// Drop every entry, returning how many were dropped
    pub fn stash_clear(&mut self) -> anyhow::Result<usize> {
        self.stash().clear()
    }
}
