//! Object database
//!
//! Content-addressed storage under `.vit/objects/<2 hex>/<38 hex>`. Objects are stored
//! uncompressed, written once through a temp file and a rename, and never overwritten.

use crate::artifacts::core::generate_temp_name;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::errors::VitError;
use anyhow::Context;
use bytes::Bytes;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, Cursor, Write};
use std::path::{Path, PathBuf};

/// Flattened tree: every file path mapped to its blob entry
pub type TreeListing = BTreeMap<PathBuf, DatabaseEntry>;

/// Slim commits already read during this invocation
///
/// Graph walks revisit commits many times; this keeps each one parsed once.
#[derive(Debug, Default)]
pub struct CommitCache {
    commits: RefCell<HashMap<ObjectId, SlimCommit>>,
}

impl CommitCache {
    fn get_or_load(
        &self,
        oid: &ObjectId,
        load: impl FnOnce() -> anyhow::Result<SlimCommit>,
    ) -> anyhow::Result<SlimCommit> {
        if let Some(commit) = self.commits.borrow().get(oid) {
            return Ok(commit.clone());
        }

        let commit = load()?;
        self.commits.borrow_mut().insert(oid.clone(), commit.clone());
        Ok(commit)
    }
}

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
    commit_cache: CommitCache,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database {
            path,
            commit_cache: CommitCache::default(),
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Id `object` would be stored under, without touching the disk
    pub fn hash_object(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        object.object_id()
    }

    /// Store `object` unless an object with the same id already exists
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_content = object.serialize()?;
        let object_id = crate::artifacts::objects::object::hash_bytes(&object_content);
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            self.write_object(&object_path, &object_content)?;
        }

        Ok(object_id)
    }

    /// Store a tree built from a flat listing along with every subtree
    pub fn store_tree(&self, tree: &Tree) -> anyhow::Result<ObjectId> {
        tree.traverse(&mut |node: &Tree| self.store(node).map(|_| ()))?;
        tree.object_id()
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Raw serialized bytes, header included
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        match std::fs::read(&object_path) {
            Ok(content) => Ok(Bytes::from(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(VitError::ObjectNotFound(object_id.clone()).into())
            }
            Err(err) => Err(VitError::Io(err))
                .with_context(|| format!("Unable to read object file {}", object_path.display())),
        }
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        let object = match object_type {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(object_reader)?)),
            ObjectType::Commit => {
                ObjectBox::Commit(Box::new(Commit::deserialize(object_reader)?))
            }
            ObjectType::Tag => ObjectBox::Tag(Box::new(Tag::deserialize(object_reader)?)),
        };

        Ok(object)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let object_reader = self.expect_type(object_id, ObjectType::Blob)?;
        Blob::deserialize(object_reader)
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        let object_reader = self.expect_type(object_id, ObjectType::Tree)?;
        Tree::deserialize(object_reader)
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let object_reader = self.expect_type(object_id, ObjectType::Commit)?;
        Commit::deserialize(object_reader)
            .with_context(|| format!("commit {object_id} is malformed"))
    }

    pub fn parse_object_as_tag(&self, object_id: &ObjectId) -> anyhow::Result<Tag> {
        let object_reader = self.expect_type(object_id, ObjectType::Tag)?;
        Tag::deserialize(object_reader)
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    /// Parents and timestamp of a commit, through the commit cache
    pub fn slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        self.commit_cache.get_or_load(object_id, || {
            Ok(self
                .parse_object_as_commit(object_id)?
                .to_slim(object_id.clone()))
        })
    }

    /// Flatten a tree, or the tree of a commit, into `path -> entry`
    ///
    /// `None` stands for the empty tree.
    pub fn load_tree_entries(&self, object_id: Option<&ObjectId>) -> anyhow::Result<TreeListing> {
        let mut listing = TreeListing::new();

        if let Some(object_id) = object_id {
            let tree_oid = self.peel_to_tree(object_id)?;
            self.flatten_tree(&tree_oid, Path::new(""), &mut listing)?;
        }

        Ok(listing)
    }

    /// Change set between two tree-ish ids, descending only into subtrees that differ
    pub fn tree_diff(
        &self,
        old_oid: Option<&ObjectId>,
        new_oid: Option<&ObjectId>,
    ) -> anyhow::Result<TreeDiff<'_>> {
        let mut tree_diff = TreeDiff::new(self);
        tree_diff.compare_oids(old_oid, new_oid, Path::new(""))?;
        Ok(tree_diff)
    }

    /// Tree id behind a commit or tree id
    pub fn peel_to_tree(&self, object_id: &ObjectId) -> anyhow::Result<ObjectId> {
        match self.get_object_type(object_id)? {
            ObjectType::Tree => Ok(object_id.clone()),
            ObjectType::Commit => Ok(self.parse_object_as_commit(object_id)?.tree_oid().clone()),
            other => anyhow::bail!("object {object_id} is a {other}, not a tree"),
        }
    }

    /// Every stored object whose id starts with `prefix`
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();

        let dirs = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        for dir_name in dirs {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let file_name = entry?.file_name();
                let full_oid = format!("{dir_name}{}", file_name.to_string_lossy());

                if full_oid.starts_with(prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    fn flatten_tree(
        &self,
        tree_oid: &ObjectId,
        prefix: &Path,
        listing: &mut TreeListing,
    ) -> anyhow::Result<()> {
        for (name, entry) in self.parse_object_as_tree(tree_oid)?.into_entries() {
            let path = prefix.join(name);

            if entry.is_tree() {
                self.flatten_tree(&entry.oid, &path, listing)?;
            } else {
                listing.insert(path, entry);
            }
        }

        Ok(())
    }

    fn expect_type(
        &self,
        object_id: &ObjectId,
        expected: ObjectType,
    ) -> anyhow::Result<impl BufRead> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        if object_type != expected {
            anyhow::bail!("object {object_id} is a {object_type}, not a {expected}");
        }

        Ok(object_reader)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let (object_type, size) = ObjectType::parse_header(&mut object_reader)
            .with_context(|| format!("object {object_id} has a malformed header"))?;
        let remaining = object_reader.get_ref().len() as u64 - object_reader.position();
        if remaining != size as u64 {
            anyhow::bail!("object {object_id} declares {size} bytes but holds {remaining}");
        }

        Ok((object_type, object_reader))
    }

    fn write_object(&self, object_path: &Path, object_content: &[u8]) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir)
            .map_err(VitError::Io)
            .with_context(|| {
                format!("Unable to create object directory {}", object_dir.display())
            })?;

        let temp_object_path = object_dir.join(generate_temp_name("obj"));
        let written = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .and_then(|mut file| file.write_all(object_content))
            .and_then(|_| std::fs::rename(&temp_object_path, object_path));

        if let Err(err) = written {
            let _ = std::fs::remove_file(&temp_object_path);
            return Err(VitError::Io(err))
                .with_context(|| format!("Unable to write object file {}", object_path.display()));
        }

        Ok(())
    }
}
