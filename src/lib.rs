//! vit: a local version-control engine
//!
//! Snapshots of a working tree are stored as content-addressed objects, named refs point
//! into the resulting commit graph, and the diff/merge/stash machinery reconciles them.
//!
//! - `areas`: durable storage areas (objects, refs, index, workspace, registries)
//! - `artifacts`: data structures and algorithms operating over those areas
//! - `commands`: the command surface, implemented as `Repository` methods
//! - `errors`: the typed error taxonomy raised by the core

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
