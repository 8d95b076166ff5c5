//! Merge base search and three-way resolution
//!
//! - `bca_finder`: best common ancestor of two commits
//! - `resolve`: per-path three-way resolution of flattened trees and conflict markers

pub mod bca_finder;
pub mod resolve;
