//! Version-control data structures and algorithms
//!
//! - `branch`: ref names and revision parsing
//! - `checkout`: workspace migrations and conflict detection
//! - `core`: shared utilities (atomic writes, temp names)
//! - `database`: database entry types
//! - `diff`: tree diffing, Myers' line diff and hunks
//! - `hooks`: lifecycle events and the hook runner boundary
//! - `index`: index/staging area data structures
//! - `log`: commit history traversal
//! - `merge`: merge base search and three-way resolution
//! - `objects`: object types (blob, tree, commit, tag)
//! - `stash`: stash entries
//! - `status`: working tree status inspection
//! - `submodules`: submodule records

pub mod branch;
pub mod checkout;
pub mod core;
pub mod database;
pub mod diff;
pub mod hooks;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod stash;
pub mod status;
pub mod submodules;
