//! Storage areas of a repository
//!
//! - `database`: content-addressed object storage
//! - `index`: staging area for the next commit
//! - `refs`: branches, tags, HEAD and in-progress merge state
//! - `repository`: owns every area for one invocation
//! - `workspace`: the working tree on disk
//! - `stash`, `hooks`, `submodules`, `tags`: the registries kept next to them

pub mod database;
pub mod hooks;
pub mod index;
pub mod refs;
pub mod repository;
pub mod stash;
pub mod submodules;
pub mod tags;
pub mod workspace;
