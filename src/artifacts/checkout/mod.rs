//! Moving the working tree and index from one tree to another
//!
//! A `Migration` is planned from a change set, checked for local work it would destroy,
//! and only then applied. Checkout, merge, revert, stash and hard reset all go through it.

pub mod conflict;
pub mod migration;
