//! Stash entries
//!
//! A stash entry is a snapshot commit floating outside every branch: its single parent is
//! the HEAD commit at save time and its tree holds the tracked files as they were in the
//! working tree.

pub mod stash_entry;

/// Label used in conflict markers and messages, `stash@{0}` being the most recent entry
pub fn stash_label(index: usize) -> String {
    format!("stash@{{{index}}}")
}
