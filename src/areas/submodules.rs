//! Submodule registry, kept in `.vit/submodules` as TOML

use crate::artifacts::core::{read_toml, write_toml};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::submodules::Submodule;
use crate::errors::VitError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SubmodulesFile {
    #[serde(default)]
    submodules: Vec<Submodule>,
}

#[derive(Debug)]
pub struct Submodules {
    path: Box<Path>,
}

impl Submodules {
    pub fn new(path: Box<Path>) -> Self {
        Submodules { path }
    }

    /// Every record, sorted by name
    pub fn list(&self) -> anyhow::Result<Vec<Submodule>> {
        let mut submodules = read_toml::<SubmodulesFile>(&self.path)?.submodules;
        submodules.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(submodules)
    }

    pub fn get(&self, name: &str) -> anyhow::Result<Submodule> {
        self.list()?
            .into_iter()
            .find(|submodule| submodule.name == name)
            .ok_or_else(|| not_registered(name))
    }

    /// Register a submodule whose name and path are both unused
    pub fn add(&self, submodule: Submodule) -> anyhow::Result<()> {
        submodule.validate()?;

        let mut submodules = self.list()?;
        if let Some(existing) = submodules
            .iter()
            .find(|existing| existing.name == submodule.name || existing.path == submodule.path)
        {
            return Err(VitError::SubmoduleError(format!(
                "{} is already registered at {}",
                existing.name,
                existing.path.display()
            ))
            .into());
        }

        tracing::debug!(
            name = %submodule.name,
            path = %submodule.path.display(),
            "adding submodule"
        );
        submodules.push(submodule);
        self.save(submodules)
    }

    pub fn remove(&self, name: &str) -> anyhow::Result<Submodule> {
        let mut submodules = self.list()?;
        let position = submodules
            .iter()
            .position(|submodule| submodule.name == name)
            .ok_or_else(|| not_registered(name))?;

        let removed = submodules.remove(position);
        self.save(submodules)?;

        Ok(removed)
    }

    /// Pin a submodule to another commit
    pub fn update(&self, name: &str, commit: ObjectId) -> anyhow::Result<Submodule> {
        let mut submodules = self.list()?;
        let submodule = submodules
            .iter_mut()
            .find(|submodule| submodule.name == name)
            .ok_or_else(|| not_registered(name))?;

        submodule.commit = commit;
        let updated = submodule.clone();
        self.save(submodules)?;

        Ok(updated)
    }

    fn save(&self, submodules: Vec<Submodule>) -> anyhow::Result<()> {
        write_toml(&self.path, &SubmodulesFile { submodules })
    }
}

fn not_registered(name: &str) -> anyhow::Error {
    VitError::SubmoduleError(format!("no submodule named {name}")).into()
}
