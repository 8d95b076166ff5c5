use crate::areas::database::TreeListing;
use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::file_diff::{DiffSide, FileDiff, diff_snapshots};
use crate::artifacts::objects::object::Object;
use std::path::Path;

impl Repository {
    /// Unstaged changes: index against working tree
    ///
    /// With a `target`, only files at that path or below it are compared; `.` means
    /// the whole tree.
    pub async fn diff(&mut self, target: Option<&Path>) -> anyhow::Result<Vec<FileDiff>> {
        let mut diffs = self.diff_sides(DiffSide::Index, DiffSide::Workspace).await?;
        if let Some(target) = target.filter(|target| *target != Path::new(".")) {
            diffs.retain(|diff| diff.path.starts_with(target));
        }

        Ok(diffs)
    }

    /// Staged changes: HEAD against index
    pub async fn diff_staged(&mut self) -> anyhow::Result<Vec<FileDiff>> {
        match self.head_commit()? {
            Some(head) => self.diff_sides(DiffSide::Commit(head), DiffSide::Index).await,
            // Nothing committed yet: everything staged is an addition
            None => {
                let index = self.index();
                let mut index = index.lock().await;
                index.rehydrate()?;

                self.diff_listings(&TreeListing::new(), DiffSide::Index, &index)
            }
        }
    }

    /// Changes from the commit `revision` names up to HEAD
    pub async fn diff_commit(&mut self, revision: &str) -> anyhow::Result<Vec<FileDiff>> {
        let old = Revision::try_parse(revision)?.resolve(self)?;
        let head = self.require_head_commit()?;

        self.diff_sides(DiffSide::Commit(old), DiffSide::Commit(head)).await
    }

    pub async fn diff_commits(&mut self, old: &str, new: &str) -> anyhow::Result<Vec<FileDiff>> {
        let old = Revision::try_parse(old)?.resolve(self)?;
        let new = Revision::try_parse(new)?.resolve(self)?;

        self.diff_sides(DiffSide::Commit(old), DiffSide::Commit(new)).await
    }

    /// Per-file differences between any two sides, ordered by path
    pub async fn diff_sides(
        &mut self,
        old: DiffSide,
        new: DiffSide,
    ) -> anyhow::Result<Vec<FileDiff>> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let old_listing = self.side_listing(&old, &index)?;
        self.diff_listings(&old_listing, new, &index)
    }

    fn diff_listings(
        &self,
        old_listing: &TreeListing,
        new: DiffSide,
        index: &Index,
    ) -> anyhow::Result<Vec<FileDiff>> {
        let new_listing = self.side_listing(&new, index)?;
        let blob_text = |_: &Path, entry: &DatabaseEntry| -> anyhow::Result<String> {
            Ok(self.database().parse_object_as_blob(&entry.oid)?.text())
        };

        match new {
            DiffSide::Workspace => diff_snapshots(old_listing, &new_listing, blob_text, |path, _| {
                Ok(String::from_utf8_lossy(&self.workspace().read_file(path)?).into_owned())
            }),
            _ => diff_snapshots(old_listing, &new_listing, blob_text, blob_text),
        }
    }

    /// Flattened view of one side
    ///
    /// The working tree side only covers tracked files. A file whose stat data still
    /// matches its index entry takes the index blob id without being read.
    fn side_listing(&self, side: &DiffSide, index: &Index) -> anyhow::Result<TreeListing> {
        match side {
            DiffSide::Commit(oid) => self.database().load_tree_entries(Some(oid)),
            DiffSide::Index => Ok(index.listing()),
            DiffSide::Workspace => {
                let mut listing = TreeListing::new();

                for entry in index.entries() {
                    let Some(stat) = self.workspace().try_stat_file(&entry.name)? else {
                        continue;
                    };
                    if stat.mode.is_tree() {
                        continue;
                    }

                    let oid = match entry.stat_match(&stat) && entry.times_match(&stat) {
                        true => entry.oid.clone(),
                        false => self.workspace().parse_blob(&entry.name)?.object_id()?,
                    };
                    listing.insert(entry.name.clone(), DatabaseEntry::new(oid, stat.mode));
                }

                Ok(listing)
            }
        }
    }
}
