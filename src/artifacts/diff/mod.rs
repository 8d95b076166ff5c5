//! Tree and content comparison
//!
//! - `tree_diff`: which files changed between two listings or stored trees
//! - `myers`: shortest edit script between two line sequences
//! - `hunk`: edit scripts grouped into hunks with surrounding context
//! - `file_diff`: per-file records between two sides (commit, index, workspace)

pub mod file_diff;
pub mod hunk;
pub mod myers;
pub mod tree_diff;
