use crate::areas::repository::Repository;
use crate::artifacts::submodules::{Submodule, parse_pin};
use std::path::PathBuf;

impl Repository {
    /// Register a submodule, pinned to `commit` or to the current HEAD commit
    pub fn submodule_add(
        &mut self,
        name: &str,
        url: &str,
        path: PathBuf,
        commit: Option<&str>,
    ) -> anyhow::Result<Submodule> {
        let commit = match commit {
            Some(commit) => parse_pin(commit)?,
            None => self.require_head_commit()?,
        };

        let submodule = Submodule::new(name.to_string(), url.to_string(), path, commit)?;
        self.submodules().add(submodule.clone())?;

        Ok(submodule)
    }

    pub fn submodule_remove(&mut self, name: &str) -> anyhow::Result<Submodule> {
        self.submodules().remove(name)
    }

    /// Pin a registered submodule to another commit
    pub fn submodule_update(&mut self, name: &str, commit: &str) -> anyhow::Result<Submodule> {
        let commit = parse_pin(commit)?;
        self.submodules().update(name, commit)
    }

    pub fn submodule_list(&self) -> anyhow::Result<Vec<Submodule>> {
        self.submodules().list()
    }

    pub fn submodule(&self, name: &str) -> anyhow::Result<Submodule> {
        self.submodules().get(name)
    }
}
