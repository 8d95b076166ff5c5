use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::errors::{VitError, is_vit_error};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Paths whose index entries an `add` created, refreshed or dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddSummary {
    pub staged: Vec<PathBuf>,
    /// Tracked files that no longer exist on disk
    pub removed: Vec<PathBuf>,
}

impl Repository {
    /// Stage files, expanding directories recursively
    ///
    /// Every path is checked before anything is stored, so a bad path stages nothing.
    pub async fn add(&mut self, paths: &[PathBuf]) -> anyhow::Result<AddSummary> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let mut files = BTreeSet::new();
        let mut removed = BTreeSet::new();

        for path in paths {
            let on_disk = match self.workspace().list_files(path) {
                Ok(on_disk) => on_disk,
                Err(err) if is_vit_error(&err, |e| matches!(e, VitError::PathNotFound(_))) => {
                    Vec::new()
                }
                Err(err) => return Err(err),
            };

            let vanished = index
                .entries_under_path(path)
                .into_iter()
                .filter(|tracked| !on_disk.contains(tracked))
                .collect::<Vec<_>>();

            if on_disk.is_empty() && vanished.is_empty() {
                return Err(match self.workspace().is_dir(path) {
                    true => VitError::IsDirectory(path.clone()),
                    false => VitError::PathNotFound(path.clone()),
                }
                .into());
            }

            files.extend(on_disk);
            removed.extend(vanished);
        }

        let mut summary = AddSummary::default();

        for path in removed {
            index.remove(&path);
            summary.removed.push(path);
        }

        for path in files {
            let stat = self.workspace().stat_file(&path)?;
            if let Some(entry) = index.entry_by_path(&path)
                && entry.stat_match(&stat)
                && entry.times_match(&stat)
            {
                continue;
            }

            let blob = self.workspace().parse_blob(&path)?;
            let blob_id = self.database().store(&blob)?;

            index.add(IndexEntry::new(path.clone(), blob_id, stat));
            summary.staged.push(path);
        }

        if index.is_changed() {
            index.write_updates()?;
        }
        tracing::debug!(
            staged = summary.staged.len(),
            removed = summary.removed.len(),
            "updated index"
        );

        Ok(summary)
    }
}
