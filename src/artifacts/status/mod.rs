//! Working tree status
//!
//! - `file_change`: change kinds for the index and workspace columns
//! - `inspector`: per-path comparisons shared with checkout
//! - `status_info`: the HEAD / index / workspace comparison itself

pub mod file_change;
pub mod inspector;
pub mod status_info;
