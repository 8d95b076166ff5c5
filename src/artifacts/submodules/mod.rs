//! Submodule records
//!
//! A submodule is a nested repository recorded by name, origin url, location inside the
//! working tree and the commit it is pinned to. Fetching from the url is not done here.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VitError;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submodule {
    pub name: String,
    pub url: String,
    pub path: PathBuf,
    pub commit: ObjectId,
}

impl Submodule {
    pub fn new(name: String, url: String, path: PathBuf, commit: ObjectId) -> anyhow::Result<Self> {
        let submodule = Submodule {
            name,
            url,
            path,
            commit,
        };
        submodule.validate()?;

        Ok(submodule)
    }

    /// Check the fields that do not depend on the other records
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if self.url.trim().is_empty() {
            return Err(invalid(format!("{} has an empty url", self.name)));
        }
        if !is_inside_tree(&self.path) {
            return Err(invalid(format!(
                "{} must be a relative path inside the repository",
                self.path.display()
            )));
        }

        Ok(())
    }
}

impl std::fmt::Display for Submodule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.commit.to_short_oid(),
            self.path.display(),
            self.name
        )
    }
}

/// Parse a pin, which has to be a full commit id
pub fn parse_pin(commit: &str) -> anyhow::Result<ObjectId> {
    match ObjectId::is_full_hex(commit) {
        true => ObjectId::try_parse(commit.to_string()),
        false => Err(invalid(format!("{commit:?} is not a full commit id"))),
    }
}

fn is_inside_tree(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

fn invalid(reason: impl Into<String>) -> anyhow::Error {
    VitError::SubmoduleError(reason.into()).into()
}
