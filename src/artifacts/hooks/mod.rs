//! Lifecycle hooks
//!
//! A hook is a script installed for one lifecycle event. The repository decides when an
//! event fires; running the script is delegated to a [`runner::HookRunner`].

pub mod hook_event;
pub mod runner;

pub const HOOK_EVENT_ENV: &str = "VIT_HOOK_EVENT";
pub const HOOK_REPO_PATH_ENV: &str = "VIT_REPO_PATH";
pub const HOOK_REFS_ENV: &str = "VIT_HOOK_REFS";
