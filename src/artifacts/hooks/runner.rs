use crate::artifacts::hooks::hook_event::HookEvent;
use crate::artifacts::hooks::{HOOK_EVENT_ENV, HOOK_REFS_ENV, HOOK_REPO_PATH_ENV};
use crate::errors::VitError;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};
use std::process::Command;
use tokio::runtime::{Handle, RuntimeFlavor};

/// What a hook is told about the operation it runs for
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct HookContext {
    pub event: HookEvent,
    /// Working tree root
    pub repo_path: PathBuf,
    /// Refs or commit ids the operation is about, e.g. the checkout target
    pub refs: Vec<String>,
}

/// Executes an installed hook script and reports its exit code
pub trait HookRunner {
    fn run(&self, script: &Path, context: &HookContext) -> anyhow::Result<i32>;
}

/// Runs hook scripts as child processes, waiting for them to finish
///
/// The context is passed through `VIT_HOOK_EVENT`, `VIT_REPO_PATH` and `VIT_HOOK_REFS`
/// (space separated); the script runs from the working tree root.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessHookRunner;

impl HookRunner for ProcessHookRunner {
    fn run(&self, script: &Path, context: &HookContext) -> anyhow::Result<i32> {
        let mut command = Command::new(script);
        command
            .current_dir(&context.repo_path)
            .env(HOOK_EVENT_ENV, context.event.as_str())
            .env(HOOK_REPO_PATH_ENV, &context.repo_path)
            .env(HOOK_REFS_ENV, context.refs.join(" "));

        // Waiting on the child must not stall a worker of a multi-threaded runtime
        let status = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| command.status())
            }
            _ => command.status(),
        }
        .map_err(VitError::Io)
        .with_context(|| format!("unable to run {} hook", context.event))?;

        // Killed by a signal: no code, counts as a failure
        Ok(status.code().unwrap_or(-1))
    }
}
