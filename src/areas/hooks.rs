//! Installed hook scripts, one file per event under `.vit/hooks/`

use crate::artifacts::hooks::hook_event::HookEvent;
use crate::errors::VitError;
use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Hooks {
    /// Path to the hooks directory (`.vit/hooks`)
    path: Box<Path>,
}

impl Hooks {
    pub fn new(path: Box<Path>) -> Self {
        Hooks { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn script_path(&self, event: HookEvent) -> PathBuf {
        self.path.join(event.as_str())
    }

    /// Script to run for `event`, if one is installed
    pub fn installed(&self, event: HookEvent) -> Option<PathBuf> {
        let script = self.script_path(event);
        script.is_file().then_some(script)
    }

    /// Install `script` for `event`, replacing any previous one
    pub fn install(&self, event: HookEvent, script: &str) -> anyhow::Result<PathBuf> {
        let script_path = self.script_path(event);

        std::fs::create_dir_all(&self.path)
            .map_err(VitError::Io)
            .with_context(|| format!("unable to create {}", self.path.display()))?;
        std::fs::write(&script_path, script)
            .map_err(VitError::Io)
            .with_context(|| format!("unable to write {event} hook"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755))
                .map_err(VitError::Io)
                .with_context(|| format!("unable to make {event} hook executable"))?;
        }

        tracing::debug!(%event, "installed hook");
        Ok(script_path)
    }

    pub fn uninstall(&self, event: HookEvent) -> anyhow::Result<()> {
        let script_path = self
            .installed(event)
            .ok_or_else(|| VitError::HookNotFound(event.to_string()))?;

        std::fs::remove_file(&script_path)
            .map_err(VitError::Io)
            .with_context(|| format!("unable to remove {event} hook"))
    }

    /// Every known event and whether a script is installed for it
    pub fn list(&self) -> Vec<(HookEvent, bool)> {
        HookEvent::ALL
            .into_iter()
            .map(|event| (event, self.installed(event).is_some()))
            .collect()
    }
}
