//! Porcelain commands
//!
//! The user-facing operations, composed from the storage areas and the artifacts.
//! They return what happened and never print; rendering is left to the caller.
//!
//! ## Commands
//!
//! - `init`: create the metadata directory
//! - `add`, `reset`: stage and unstage files
//! - `commit`, `revert`: record snapshots
//! - `status`, `diff`, `log`: inspect the repository
//! - `branch`, `checkout`, `tag`: manage refs and move HEAD
//! - `merge`: join histories
//! - `stash`: put local changes aside
//! - `hook`, `submodule`: manage the registries

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod hook;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod revert;
pub mod stash;
pub mod status;
pub mod submodule;
pub mod tag;
