use crate::areas::index::Index;
use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::hooks::hook_event::HookEvent;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VitError;

/// HEAD before and after a checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub previous: Head,
    pub previous_commit: Option<ObjectId>,
    pub head: Head,
    pub commit: ObjectId,
}

impl CheckoutOutcome {
    pub fn is_detached(&self) -> bool {
        matches!(self.head, Head::Detached(_))
    }

    /// HEAD just left a branch for a bare commit
    pub fn detached_now(&self) -> bool {
        matches!(self.previous, Head::Attached(_)) && self.is_detached()
    }
}

impl Repository {
    /// Switch to a branch (attaching HEAD) or to a tag or commit (detaching it)
    ///
    /// Local changes survive when the target leaves their files alone; otherwise the
    /// checkout is refused with `CheckoutConflict` before anything is touched.
    pub async fn checkout(&mut self, target: &str) -> anyhow::Result<CheckoutOutcome> {
        let new_head = self.checkout_target(target)?;
        self.switch_to(new_head, target).await
    }

    /// Head a checkout target designates: a branch wins over any other reading of the name
    fn checkout_target(&self, target: &str) -> anyhow::Result<Head> {
        if let Ok(branch) = BranchName::try_parse(target)
            && self.refs().branch_commit(&branch)?.is_some()
        {
            return Ok(Head::Attached(branch));
        }

        let oid = Revision::try_parse(target)?.resolve(self)?;
        Ok(Head::Detached(oid))
    }

    pub(crate) async fn switch_to(
        &mut self,
        new_head: Head,
        target: &str,
    ) -> anyhow::Result<CheckoutOutcome> {
        let previous = self.head()?;
        let previous_commit = self.head_commit()?;
        let commit = self
            .refs()
            .head_commit(&new_head)?
            .ok_or_else(|| VitError::NoCommits(new_head.to_string()))?;

        self.run_hook(HookEvent::PreCheckout, vec![previous.to_string(), target.to_string()])?;

        {
            let index = self.index();
            let mut index = index.lock().await;
            index.rehydrate()?;

            self.migrate(&mut index, previous_commit.as_ref(), &commit)?;
        }

        self.set_head(new_head.clone())?;
        self.run_hook(HookEvent::PostCheckout, vec![previous.to_string(), new_head.to_string()])?;

        Ok(CheckoutOutcome {
            previous,
            previous_commit,
            head: new_head,
            commit,
        })
    }

    /// Move index and working tree from the tree of `from` to the tree of `to`
    ///
    /// Refuses with `CheckoutConflict` when local work would be overwritten; the
    /// index is written back on success.
    pub(crate) fn migrate(
        &self,
        index: &mut Index,
        from: Option<&ObjectId>,
        to: &ObjectId,
    ) -> anyhow::Result<()> {
        let changes = self.database().tree_diff(from, Some(to))?.into_changes();

        let mut migration = Migration::new(self.workspace(), self.database(), changes);
        migration.check_conflicts(index)?;
        migration.apply(index)?;

        index.write_updates()
    }
}
