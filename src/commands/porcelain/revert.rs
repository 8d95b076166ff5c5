use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::hooks::hook_event::HookEvent;
use crate::artifacts::objects::object_id::ObjectId;
use crate::commands::porcelain::commit::resolve_author;
use crate::errors::VitError;

impl Repository {
    /// Undo the changes a commit introduced with a new commit on top of HEAD
    ///
    /// Runs the three-way merge with the reverted commit as base and its first parent as
    /// the other side, so later edits to the same lines conflict instead of being lost.
    pub async fn revert(
        &mut self,
        revision: &str,
        author: Option<&str>,
    ) -> anyhow::Result<ObjectId> {
        let reverted = Revision::try_parse(revision)?.resolve(self)?;
        let ours = self.require_head_commit()?;
        let author = resolve_author(author)?;

        let commit = self.database().parse_object_as_commit(&reverted)?;
        let parent = commit.parent().cloned();

        self.run_hook(HookEvent::PreCommit, vec![self.head_name(), reverted.to_string()])?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        self.ensure_clean(&mut index)?;

        let theirs_name = format!("parent of {}", reverted.to_short_oid());

        let resolution = self.apply_three_way(
            &mut index,
            &self.database().load_tree_entries(Some(&reverted))?,
            &self.database().load_tree_entries(Some(&ours))?,
            &self.database().load_tree_entries(parent.as_ref())?,
            &theirs_name,
        )?;
        if !resolution.is_clean() {
            return Err(VitError::MergeConflict(resolution.conflicted_paths()).into());
        }

        let message = format!("Revert \"{}\"", commit.short_message());
        let commit_id = self.write_commit(vec![ours.clone()], &index.listing(), author, &message)?;
        self.advance_head(Some(&ours), &commit_id)?;
        self.run_hook(HookEvent::PostCommit, vec![commit_id.to_string()])?;

        Ok(commit_id)
    }
}
