use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::VitError;
use anyhow::Context;
use std::fs;

/// What `init` found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    /// The repository already existed and was left untouched
    Reinitialized,
}

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<InitOutcome> {
        if self.is_initialized() {
            return Ok(InitOutcome::Reinitialized);
        }

        for dir in [
            self.database().objects_path().to_path_buf(),
            self.refs().heads_path(),
            self.refs().tags_path(),
            self.hooks().path().to_path_buf(),
        ] {
            fs::create_dir_all(&dir)
                .map_err(VitError::Io)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        self.set_head(Head::Attached(BranchName::try_parse(DEFAULT_BRANCH)?))
            .context("failed to create the initial HEAD")?;

        let index = self.index();
        let mut index = index.lock().await;
        if !index.path().exists() {
            index.write_updates()?;
        }

        tracing::debug!(path = %self.path().display(), "initialized repository");
        Ok(InitOutcome::Created)
    }
}
