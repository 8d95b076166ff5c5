use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One saved set of local changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashEntry {
    /// Position in the stack, 0 being the most recent; assigned when the stack is read
    #[serde(skip)]
    pub index: usize,
    pub message: String,
    /// `Name <email>` of whoever saved the entry
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    /// HEAD commit the changes were made on top of
    pub parent: ObjectId,
    /// Commit holding the stashed tree
    pub snapshot: ObjectId,
}

impl StashEntry {
    pub fn new(
        message: String,
        author: String,
        timestamp: DateTime<FixedOffset>,
        parent: ObjectId,
        snapshot: ObjectId,
    ) -> Self {
        StashEntry {
            index: 0,
            message,
            author,
            timestamp,
            parent,
            snapshot,
        }
    }

    /// Message recorded when the caller gives none
    pub fn default_message(branch: Option<&str>, parent: &ObjectId, short_message: &str) -> String {
        format!(
            "WIP on {}: {} {}",
            branch.unwrap_or("(no branch)"),
            parent.to_short_oid(),
            short_message
        )
    }
}

impl std::fmt::Display for StashEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", super::stash_label(self.index), self.message)
    }
}
