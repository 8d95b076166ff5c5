//! Command implementations
//!
//! Every command is a method on [`crate::areas::repository::Repository`], split in two
//! groups:
//!
//! - `plumbing`: direct object database access (hash-object, cat-file)
//! - `porcelain`: version control workflows (add, commit, merge, stash, ...)

pub mod plumbing;
pub mod porcelain;
