use crate::areas::database::TreeListing;
use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::tree_diff::diff_listings;
use crate::artifacts::hooks::hook_event::HookEvent;
use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::log::history::is_ancestor;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::merge::resolve::{Resolution, conflict_markers, resolve};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::commands::porcelain::commit::resolve_author;
use crate::errors::VitError;
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The merged commit is already part of HEAD's history
    AlreadyUpToDate,
    /// HEAD moved forward to the merged commit, no commit was created
    FastForward(ObjectId),
    /// A merge commit with parents `[ours, theirs]`
    Merged(ObjectId),
}

impl Repository {
    /// Merge the commit `target` names into HEAD
    ///
    /// Conflicting paths get marker blocks in the working tree, are staged as they are,
    /// and the merge state is recorded so the next `commit` concludes the merge; the
    /// call then fails with `MergeConflict`.
    pub async fn merge(
        &mut self,
        target: &str,
        message: Option<&str>,
    ) -> anyhow::Result<MergeOutcome> {
        let theirs = Revision::try_parse(target)?.resolve(self)?;
        let ours = self.require_head_commit()?;

        self.run_hook(HookEvent::PreMerge, vec![self.head_name(), target.to_string()])?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        self.ensure_clean(&mut index)?;

        if is_ancestor(self.database(), &theirs, &ours)? {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        if is_ancestor(self.database(), &ours, &theirs)? {
            tracing::debug!(from = %ours, to = %theirs, "fast-forward");
            self.migrate(&mut index, Some(&ours), &theirs)?;
            self.advance_head(Some(&ours), &theirs)?;
            self.run_hook(HookEvent::PostMerge, vec![theirs.to_string()])?;

            return Ok(MergeOutcome::FastForward(theirs));
        }

        let base = BCAFinder::new(|oid| self.database().slim_commit(oid))
            .find_best_common_ancestor(&ours, &theirs)?;
        tracing::debug!(?base, %ours, %theirs, "merging");

        let base_listing = self.database().load_tree_entries(base.as_ref())?;
        let ours_listing = self.database().load_tree_entries(Some(&ours))?;
        let theirs_listing = self.database().load_tree_entries(Some(&theirs))?;

        let resolution =
            self.apply_three_way(
                &mut index,
                &base_listing,
                &ours_listing,
                &theirs_listing,
                target,
            )?;

        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Merge {target} into {}", self.head_name()));

        if !resolution.is_clean() {
            self.refs().set_merge_state(&theirs, &message)?;
            return Err(VitError::MergeConflict(resolution.conflicted_paths()).into());
        }

        let author = resolve_author(None)?;
        let commit_id =
            self.write_commit(vec![ours.clone(), theirs], &index.listing(), author, &message)?;
        self.advance_head(Some(&ours), &commit_id)?;
        self.run_hook(HookEvent::PostMerge, vec![commit_id.to_string()])?;

        Ok(MergeOutcome::Merged(commit_id))
    }

    /// Bring index and working tree from `ours` to the three-way merge of the listings
    ///
    /// `index` must match `ours`. Cleanly merged paths are written and staged; each
    /// conflicted path gets a marker file that is staged as is. The index is written back.
    pub(crate) fn apply_three_way(
        &self,
        index: &mut Index,
        base: &TreeListing,
        ours: &TreeListing,
        theirs: &TreeListing,
        theirs_name: &str,
    ) -> anyhow::Result<Resolution> {
        let resolution = resolve(base, ours, theirs);

        let mut changes = diff_listings(ours, &resolution.merged);
        changes.retain(|path, _| !resolution.conflicts.contains_key(path));

        // A side that deleted a conflicted path leaves nothing tracked there, so anything
        // on disk at that path is untracked work the marker file would overwrite
        let overwritten = resolution
            .conflicts
            .iter()
            .filter(|(_, conflict)| conflict.ours.is_none())
            .filter(|(path, _)| self.workspace().path().join(path).exists())
            .map(|(path, _)| path.clone())
            .collect::<Vec<_>>();
        if !overwritten.is_empty() {
            return Err(VitError::CheckoutConflict(overwritten).into());
        }

        let mut migration = Migration::new(self.workspace(), self.database(), changes);
        migration.check_conflicts(index)?;
        migration.apply(index)?;

        for (path, conflict) in &resolution.conflicts {
            let content = conflict_markers(
                &self.side_text(conflict.ours.as_ref())?,
                &self.side_text(conflict.theirs.as_ref())?,
                theirs_name,
            );
            let mode = conflict
                .ours
                .as_ref()
                .or(conflict.theirs.as_ref())
                .map(|entry| entry.mode)
                .unwrap_or(EntryMode::File(FileMode::Regular));

            self.workspace().write_file(path, content.as_bytes(), mode)?;
            let blob_id = self.database().store(&Blob::new(Bytes::from(content)))?;
            let stat = self.workspace().stat_file(path)?;
            index.add(IndexEntry::new(path.clone(), blob_id, stat));
        }

        index.write_updates()?;
        tracing::debug!(
            merged = resolution.merged.len(),
            conflicts = resolution.conflicts.len(),
            "applied three-way merge"
        );

        Ok(resolution)
    }

    fn side_text(&self, entry: Option<&DatabaseEntry>) -> anyhow::Result<String> {
        match entry {
            Some(entry) => Ok(self.database().parse_object_as_blob(&entry.oid)?.text()),
            None => Ok(String::new()),
        }
    }
}
