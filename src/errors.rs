//! Typed failures raised by the core
//!
//! Core operations return `anyhow::Result` and raise these variants through it, so callers
//! that need to branch on a failure kind use `err.downcast_ref::<VitError>()`.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VitError {
    #[error("not a vit repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("ref {0} not found")]
    RefNotFound(String),

    #[error("ref {0} already exists")]
    RefAlreadyExists(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),

    #[error("cannot delete branch {0} while it is checked out")]
    CurrentBranch(String),

    #[error("ref {0} was moved by another operation, try again")]
    RefChanged(String),

    #[error("unable to lock {}: another operation holds it", .0.display())]
    RefLocked(PathBuf),

    #[error("ref {name} is corrupt: {reason}")]
    CorruptRef { name: String, reason: String },

    #[error("path {} does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("{} is a directory with no files to add", .0.display())]
    IsDirectory(PathBuf),

    #[error("corrupt history: commit {0} is reachable from itself")]
    CorruptHistory(ObjectId),

    #[error("merge conflict in {}", join_paths(.0))]
    MergeConflict(Vec<PathBuf>),

    #[error("uncommitted changes would be lost by merging: {}", join_paths(.0))]
    DirtyWorkingTree(Vec<PathBuf>),

    #[error("local changes would be overwritten: {}", join_paths(.0))]
    CheckoutConflict(Vec<PathBuf>),

    #[error("{event} hook rejected the operation (exit code {code})")]
    HookRejected { event: String, code: i32 },

    #[error("no {0} hook is installed")]
    HookNotFound(String),

    #[error("stash@{{{0}}} does not exist")]
    StashNotFound(usize),

    #[error("no local changes to stash")]
    NothingToStash,

    #[error("submodule error: {0}")]
    SubmoduleError(String),

    #[error("{0} does not point to any commit yet")]
    NoCommits(String),

    #[error("commit message cannot be empty")]
    EmptyMessage,

    #[error("invalid author {0:?}, expected \"Name <email>\"")]
    InvalidAuthor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether `err` carries the given typed failure, whatever context was attached on top.
pub fn is_vit_error(err: &anyhow::Error, matches: impl Fn(&VitError) -> bool) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<VitError>())
        .any(matches)
}
