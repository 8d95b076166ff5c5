//! Database entry types
//!
//! Entries read back from stored trees: an object id paired with its mode.

pub mod database_entry;
