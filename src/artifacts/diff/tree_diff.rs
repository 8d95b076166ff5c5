use crate::areas::database::{Database, TreeListing};
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChangeType {
    Added(DatabaseEntry),
    Deleted(DatabaseEntry),
    Modified {
        old: DatabaseEntry,
        new: DatabaseEntry,
    },
}

impl TreeChangeType {
    pub fn from_entries(old: Option<DatabaseEntry>, new: Option<DatabaseEntry>) -> Option<Self> {
        match (old, new) {
            (None, Some(new)) => Some(TreeChangeType::Added(new)),
            (Some(old), None) => Some(TreeChangeType::Deleted(old)),
            (Some(old), Some(new)) if old != new => Some(TreeChangeType::Modified { old, new }),
            _ => None,
        }
    }

    pub fn old_entry(&self) -> Option<&DatabaseEntry> {
        match self {
            TreeChangeType::Deleted(entry) => Some(entry),
            TreeChangeType::Modified { old, .. } => Some(old),
            TreeChangeType::Added(_) => None,
        }
    }

    pub fn new_entry(&self) -> Option<&DatabaseEntry> {
        match self {
            TreeChangeType::Added(entry) => Some(entry),
            TreeChangeType::Modified { new, .. } => Some(new),
            TreeChangeType::Deleted(_) => None,
        }
    }

    pub fn status_char(&self) -> char {
        match self {
            TreeChangeType::Added(_) => 'A',
            TreeChangeType::Deleted(_) => 'D',
            TreeChangeType::Modified { .. } => 'M',
        }
    }
}

/// File-level changes keyed by path, directories flattened away
pub type ChangeSet = BTreeMap<PathBuf, TreeChangeType>;

/// Changes between two flat listings
///
/// Entries present on both sides with the same id and mode produce nothing.
pub fn diff_listings(old: &TreeListing, new: &TreeListing) -> ChangeSet {
    let mut change_set = ChangeSet::new();

    for (path, entry) in old {
        let change = TreeChangeType::from_entries(Some(entry.clone()), new.get(path).cloned());
        if let Some(change) = change {
            change_set.insert(path.clone(), change);
        }
    }

    for (path, entry) in new {
        if !old.contains_key(path) {
            change_set.insert(path.clone(), TreeChangeType::Added(entry.clone()));
        }
    }

    change_set
}

/// Recursive comparison of two stored trees
///
/// Subtrees whose ids are equal are skipped without being loaded.
#[derive(Debug)]
pub struct TreeDiff<'r> {
    database: &'r Database,
    change_set: ChangeSet,
}

impl<'r> TreeDiff<'r> {
    pub fn new(database: &'r Database) -> Self {
        TreeDiff {
            database,
            change_set: ChangeSet::new(),
        }
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.change_set
    }

    pub fn into_changes(self) -> ChangeSet {
        self.change_set
    }

    pub fn compare_oids(
        &mut self,
        old: Option<&ObjectId>,
        new: Option<&ObjectId>,
        prefix: &Path,
    ) -> anyhow::Result<()> {
        if old == new {
            return Ok(());
        }

        let old_entries = self.direct_entries(old)?;
        let new_entries = self.direct_entries(new)?;

        for (name, entry) in &old_entries {
            let other = new_entries.get(name);
            if other == Some(entry) {
                continue;
            }

            let path = prefix.join(name);
            let subtree = |entry: Option<&DatabaseEntry>| {
                entry.filter(|entry| entry.is_tree()).map(|entry| entry.oid.clone())
            };
            let blob =
                |entry: Option<&DatabaseEntry>| entry.filter(|entry| !entry.is_tree()).cloned();

            self.compare_oids(subtree(Some(entry)).as_ref(), subtree(other).as_ref(), &path)?;

            if let Some(change) = TreeChangeType::from_entries(blob(Some(entry)), blob(other)) {
                self.change_set.insert(path, change);
            }
        }

        for (name, entry) in &new_entries {
            if old_entries.contains_key(name) {
                continue;
            }

            let path = prefix.join(name);
            match entry.is_tree() {
                true => self.compare_oids(None, Some(&entry.oid), &path)?,
                false => {
                    self.change_set
                        .insert(path, TreeChangeType::Added(entry.clone()));
                }
            }
        }

        Ok(())
    }

    fn direct_entries(
        &self,
        oid: Option<&ObjectId>,
    ) -> anyhow::Result<BTreeMap<String, DatabaseEntry>> {
        let Some(oid) = oid else {
            return Ok(BTreeMap::new());
        };

        let tree_oid = self.database.peel_to_tree(oid)?;
        Ok(self
            .database
            .parse_object_as_tree(&tree_oid)?
            .into_entries()
            .collect())
    }
}
