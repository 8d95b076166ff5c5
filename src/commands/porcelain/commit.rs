use crate::areas::database::TreeListing;
use crate::areas::repository::Repository;
use crate::artifacts::hooks::hook_event::HookEvent;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::VitError;

/// `--author` value when given, the environment otherwise
pub fn resolve_author(author: Option<&str>) -> anyhow::Result<Author> {
    match author {
        Some(identity) => Author::parse_identity(identity),
        None => Ok(Author::load_from_env()),
    }
}

impl Repository {
    /// Record the index as a new commit on top of HEAD
    ///
    /// When a conflicted merge is waiting, the commit gets the merged commit as second
    /// parent and the merge state is cleared.
    pub async fn commit(
        &mut self,
        message: &str,
        author: Option<&str>,
    ) -> anyhow::Result<ObjectId> {
        let message = message.trim();
        if message.is_empty() {
            return Err(VitError::EmptyMessage.into());
        }
        let author = resolve_author(author)?;
        let head = self.head()?;

        self.run_hook(HookEvent::PreCommit, vec![head.to_string()])?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let merge_head = self.refs().merge_head()?;
        let parent = self.head_commit()?;
        let parents = parent
            .iter()
            .cloned()
            .chain(merge_head.clone())
            .collect::<Vec<_>>();

        let commit_id = self.write_commit(parents, &index.listing(), author, message)?;
        self.advance_head(parent.as_ref(), &commit_id)?;
        if merge_head.is_some() {
            self.refs().clear_merge_state()?;
        }

        self.run_hook(HookEvent::PostCommit, vec![commit_id.to_string()])?;
        Ok(commit_id)
    }

    /// Store `snapshot` as a tree and a commit over it, without moving any ref
    pub(crate) fn write_commit(
        &self,
        parents: Vec<ObjectId>,
        snapshot: &TreeListing,
        author: Author,
        message: &str,
    ) -> anyhow::Result<ObjectId> {
        let tree = Tree::build(
            snapshot
                .iter()
                .map(|(path, entry)| (path.as_path(), entry.clone())),
        )?;
        let tree_id = self.database().store_tree(&tree)?;

        let commit = Commit::new(parents, tree_id, author, message.to_string());
        let commit_id = self.database().store(&commit)?;
        tracing::debug!(commit = %commit_id, "stored commit");

        Ok(commit_id)
    }
}
