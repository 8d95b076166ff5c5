//! Tag annotations
//!
//! `refs/tags/<name>` points straight at the tagged commit. The tag object carrying the
//! tagger and message is found through `.vit/tags`, a TOML table of tag name to tag
//! object id.

use crate::artifacts::core::{read_toml, write_toml};
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::Path;

type TagsFile = BTreeMap<String, ObjectId>;

#[derive(Debug)]
pub struct TagAnnotations {
    path: Box<Path>,
}

impl TagAnnotations {
    pub fn new(path: Box<Path>) -> Self {
        TagAnnotations { path }
    }

    pub fn get(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        Ok(read_toml::<TagsFile>(&self.path)?.remove(name))
    }

    pub fn record(&self, name: &str, tag_oid: &ObjectId) -> anyhow::Result<()> {
        let mut tags = read_toml::<TagsFile>(&self.path)?;
        tags.insert(name.to_string(), tag_oid.clone());
        write_toml(&self.path, &tags)
    }

    pub fn forget(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let mut tags = read_toml::<TagsFile>(&self.path)?;
        let removed = tags.remove(name);
        if removed.is_some() {
            write_toml(&self.path, &tags)?;
        }

        Ok(removed)
    }
}
