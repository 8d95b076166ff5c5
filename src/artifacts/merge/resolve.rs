use crate::areas::database::TreeListing;
use crate::artifacts::database::database_entry::DatabaseEntry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Both sides of a path that could not be resolved, `None` where a side deleted it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub ours: Option<DatabaseEntry>,
    pub theirs: Option<DatabaseEntry>,
}

/// Outcome of a three-way merge of flattened trees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Every cleanly resolved file
    pub merged: TreeListing,
    pub conflicts: BTreeMap<PathBuf, Conflict>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn conflicted_paths(&self) -> Vec<PathBuf> {
        self.conflicts.keys().cloned().collect()
    }
}

/// Resolve every path present in any of the three listings
///
/// A side that left a path as it was in `base` takes the other side's version;
/// identical changes on both sides agree. Anything else conflicts, including a
/// deletion against a modification and two different additions.
pub fn resolve(base: &TreeListing, ours: &TreeListing, theirs: &TreeListing) -> Resolution {
    let paths = base
        .keys()
        .chain(ours.keys())
        .chain(theirs.keys())
        .collect::<BTreeSet<_>>();

    let mut resolution = Resolution::default();

    for path in paths {
        let (b, o, t) = (base.get(path), ours.get(path), theirs.get(path));

        let picked = if o == t || b == t {
            o
        } else if b == o {
            t
        } else {
            resolution.conflicts.insert(
                path.clone(),
                Conflict {
                    ours: o.cloned(),
                    theirs: t.cloned(),
                },
            );
            continue;
        };

        if let Some(entry) = picked {
            resolution.merged.insert(path.clone(), entry.clone());
        }
    }

    resolution
}

/// Working-tree content of a conflicted file
///
/// One trailing newline is dropped from each side so it is not doubled by the
/// separator lines.
pub fn conflict_markers(ours: &str, theirs: &str, theirs_name: &str) -> String {
    let trim = |side: &str| side.strip_suffix('\n').unwrap_or(side).to_string();

    format!(
        "<<<<<<< HEAD\n{}\n=======\n{}\n>>>>>>> {theirs_name}\n",
        trim(ours),
        trim(theirs)
    )
}
