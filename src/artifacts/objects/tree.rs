//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Tree Building
//!
//! Trees can be built from:
//! - A flat `path -> entry` listing (the index, a merge result, a stash snapshot)
//! - Existing tree objects (for reading)

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Component, Path};

/// Entry of a tree under construction
#[derive(Debug, Clone)]
enum TreeEntry {
    File(DatabaseEntry),
    Directory(Tree),
}

impl TreeEntry {
    fn mode(&self) -> &EntryMode {
        match self {
            TreeEntry::File(entry) => &entry.mode,
            TreeEntry::Directory(_) => &EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::File(entry) => Ok(entry.oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }
}

/// Tree object representing a directory snapshot
///
/// Trees maintain two sets of entries:
/// - `readable_entries`: for trees loaded from the database
/// - `writeable_entries`: for trees being built from a flat listing
///
/// Directory keys in `writeable_entries` carry a trailing `/`, so the
/// serialized order places `a/` after `a.txt` the way readers expect.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    readable_entries: BTreeMap<String, DatabaseEntry>,
    writeable_entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a tree hierarchy from flat `path -> entry` pairs
    ///
    /// Intermediate directories are created as needed. Paths are relative
    /// to the repository root.
    pub fn build<'p>(
        entries: impl IntoIterator<Item = (&'p Path, DatabaseEntry)>,
    ) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for (path, entry) in entries {
            let names = path
                .components()
                .map(|component| match component {
                    Component::Normal(name) => name
                        .to_str()
                        .map(str::to_string)
                        .with_context(|| format!("non UTF-8 path {}", path.display())),
                    _ => Err(anyhow::anyhow!("invalid tree path {}", path.display())),
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            root.add_entry(&names, entry)?;
        }

        Ok(root)
    }

    /// Visit every tree node children first
    ///
    /// Child object ids must exist before their parent refers to them,
    /// so storing a tree walks it in this order.
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        for entry in self.writeable_entries.values() {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(func)?;
            }
        }

        func(self)
    }

    fn add_entry(&mut self, names: &[String], entry: DatabaseEntry) -> anyhow::Result<()> {
        match names {
            [] => anyhow::bail!("cannot add an entry without a name"),
            [name] => {
                self.writeable_entries
                    .insert(name.clone(), TreeEntry::File(entry));
            }
            [parent, rest @ ..] => {
                let key = format!("{parent}/");
                let child = self
                    .writeable_entries
                    .entry(key)
                    .or_insert_with(|| TreeEntry::Directory(Tree::default()));

                match child {
                    TreeEntry::Directory(tree) => tree.add_entry(rest, entry)?,
                    TreeEntry::File(_) => anyhow::bail!("{parent} is both a file and a directory"),
                }
            }
        }

        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.readable_entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.readable_entries.into_iter()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = Vec::new();

        for (name, tree_entry) in &self.writeable_entries {
            let name = name.trim_end_matches('/');
            write!(content, "{:o} {}", tree_entry.mode().as_u32(), name)?;
            content.push(0);
            tree_entry.oid()?.write_h40_to(&mut content)?;
        }

        let mut read = self.readable_entries.iter().collect::<Vec<_>>();
        read.sort_by_key(|(name, entry)| match entry.is_tree() {
            true => format!("{name}/"),
            false => name.to_string(),
        });
        for (name, entry) in read {
            write!(content, "{:o} {}", entry.mode.as_u32(), name)?;
            content.push(0);
            entry.oid.write_h40_to(&mut content)?;
        }

        frame(self.object_type(), &content)
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();

        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break;
            }
            if mode_bytes.pop() != Some(b' ') {
                anyhow::bail!("unexpected EOF in mode");
            }
            let mode = EntryMode::from_octal_str(std::str::from_utf8(&mode_bytes)?)?;

            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                anyhow::bail!("unexpected EOF in name");
            }
            let name = std::str::from_utf8(&name_bytes)?.to_owned();

            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            entries.insert(name, DatabaseEntry::new(oid, mode));
        }

        Ok(Tree {
            readable_entries: entries,
            writeable_entries: Default::default(),
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        let kind = |mode: &EntryMode| match mode.is_tree() {
            true => ObjectType::Tree,
            false => ObjectType::Blob,
        };

        let written = self.writeable_entries.iter().map(|(name, entry)| {
            format!(
                "{} {} {}\t{}",
                entry.mode().as_str(),
                kind(entry.mode()),
                entry.oid().unwrap_or_default(),
                name.trim_end_matches('/')
            )
        });
        let read = self.readable_entries.iter().map(|(name, entry)| {
            format!(
                "{} {} {}\t{}",
                entry.mode.as_str(),
                kind(&entry.mode),
                entry.oid,
                name
            )
        });

        written.chain(read).collect::<Vec<_>>().join("\n")
    }
}
