//! Stash stack
//!
//! Entries are kept in `.vit/stash` as TOML, most recent first. The snapshot commits
//! themselves live in the object database like any other commit.

use crate::artifacts::core::{read_toml, write_toml};
use crate::artifacts::stash::stash_entry::StashEntry;
use crate::errors::VitError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StashFile {
    #[serde(default)]
    entries: Vec<StashEntry>,
}

#[derive(Debug)]
pub struct StashStack {
    /// Path to the stash file (`.vit/stash`)
    path: Box<Path>,
}

impl StashStack {
    pub fn new(path: Box<Path>) -> Self {
        StashStack { path }
    }

    /// Every entry, numbered from 0 for the most recent
    pub fn list(&self) -> anyhow::Result<Vec<StashEntry>> {
        let file = read_toml::<StashFile>(&self.path)?;

        Ok(file
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| StashEntry { index, ..entry })
            .collect())
    }

    pub fn get(&self, index: usize) -> anyhow::Result<StashEntry> {
        self.list()?
            .into_iter()
            .nth(index)
            .ok_or_else(|| VitError::StashNotFound(index).into())
    }

    /// Put `entry` on top, shifting every other entry down by one
    pub fn push(&self, entry: StashEntry) -> anyhow::Result<StashEntry> {
        let mut entries = self.list()?;
        entries.insert(0, entry);
        self.save(entries)?;

        self.get(0)
    }

    pub fn remove(&self, index: usize) -> anyhow::Result<StashEntry> {
        let mut entries = self.list()?;
        if index >= entries.len() {
            return Err(VitError::StashNotFound(index).into());
        }

        let removed = entries.remove(index);
        self.save(entries)?;

        Ok(removed)
    }

    /// Drop every entry, returning how many there were
    pub fn clear(&self) -> anyhow::Result<usize> {
        let count = self.list()?.len();
        self.save(Vec::new())?;

        Ok(count)
    }

    fn save(&self, entries: Vec<StashEntry>) -> anyhow::Result<()> {
        tracing::debug!(entries = entries.len(), "writing stash stack");
        write_toml(&self.path, &StashFile { entries })
    }
}
