use crate::areas::repository::Repository;
use crate::artifacts::hooks::hook_event::HookEvent;
use crate::errors::VitError;
use anyhow::Context;
use std::path::{Path, PathBuf};

impl Repository {
    /// Install the script at `script_path` for `event`
    pub fn hook_install(
        &mut self,
        event: HookEvent,
        script_path: &Path,
    ) -> anyhow::Result<PathBuf> {
        let script = std::fs::read_to_string(script_path)
            .map_err(VitError::Io)
            .with_context(|| format!("unable to read hook script {}", script_path.display()))?;

        self.hooks().install(event, &script)
    }

    pub fn hook_uninstall(&mut self, event: HookEvent) -> anyhow::Result<()> {
        self.hooks().uninstall(event)
    }

    /// Every event and whether a script is installed for it
    pub fn hook_list(&self) -> Vec<(HookEvent, bool)> {
        self.hooks().list()
    }
}
