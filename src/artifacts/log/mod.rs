//! Commit history traversal
//!
//! `history` walks the commit graph lazily from a starting commit, either along first
//! parents only or through every parent, yielding each commit once.

pub mod history;
