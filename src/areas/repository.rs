use crate::areas::database::{Database, TreeListing};
use crate::areas::hooks::Hooks;
use crate::areas::index::Index;
use crate::areas::refs::{HEAD_REF_NAME, Head, Refs};
use crate::areas::stash::StashStack;
use crate::areas::submodules::Submodules;
use crate::areas::tags::TagAnnotations;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::hooks::hook_event::HookEvent;
use crate::artifacts::hooks::runner::{HookContext, HookRunner, ProcessHookRunner};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use crate::errors::VitError;
use anyhow::Context;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Name of the metadata directory at the root of the working tree
pub const METADATA_DIR: &str = ".vit";

/// One repository opened for the length of an invocation
///
/// Owns every storage area. HEAD is read once when the repository is opened and kept in
/// memory afterwards; [`Repository::set_head`] updates the file and the cached value
/// together.
pub struct Repository {
    path: Box<Path>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    stash: StashStack,
    hooks: Hooks,
    submodules: Submodules,
    tags: TagAnnotations,
    head: RefCell<Option<Head>>,
    hook_runner: Box<dyn HookRunner>,
}

impl Repository {
    /// Open the repository whose working tree is `path`, creating the directory if needed
    ///
    /// The metadata directory does not have to exist yet, so this is also the entry point
    /// for `init`.
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)
            .map_err(VitError::Io)
            .with_context(|| format!("unable to create {}", path.display()))?;
        let path = path
            .canonicalize()
            .map_err(VitError::Io)
            .with_context(|| format!("unable to resolve {}", path.display()))?;

        let metadata_path = path.join(METADATA_DIR);
        let refs = Refs::new(metadata_path.clone().into_boxed_path());
        let head = refs.read_head()?;

        Ok(Repository {
            index: Arc::new(Mutex::new(Index::new(
                metadata_path.join("index").into_boxed_path(),
            ))),
            database: Database::new(metadata_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs,
            stash: StashStack::new(metadata_path.join("stash").into_boxed_path()),
            hooks: Hooks::new(metadata_path.join("hooks").into_boxed_path()),
            submodules: Submodules::new(metadata_path.join("submodules").into_boxed_path()),
            tags: TagAnnotations::new(metadata_path.join("tags").into_boxed_path()),
            head: RefCell::new(head),
            hook_runner: Box::new(ProcessHookRunner),
            path: path.into_boxed_path(),
        })
    }

    /// Open the repository containing `start`, looking through its ancestors
    pub fn discover(start: impl AsRef<Path>) -> anyhow::Result<Self> {
        let start = start
            .as_ref()
            .canonicalize()
            .map_err(VitError::Io)
            .with_context(|| format!("unable to resolve {}", start.as_ref().display()))?;

        let root = start
            .ancestors()
            .find(|dir| dir.join(METADATA_DIR).is_dir())
            .ok_or_else(|| VitError::NotARepository(start.clone()))?;

        Self::new(root)
    }

    pub fn with_hook_runner(mut self, hook_runner: Box<dyn HookRunner>) -> Self {
        self.hook_runner = hook_runner;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir() && self.head.borrow().is_some()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn stash(&self) -> &StashStack {
        &self.stash
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn submodules(&self) -> &Submodules {
        &self.submodules
    }

    pub fn tags(&self) -> &TagAnnotations {
        &self.tags
    }

    pub fn status_inspector(&'_ self) -> Status<'_> {
        Status::new(&self.workspace)
    }

    /// HEAD as read when the repository was opened, or as last set
    pub fn head(&self) -> anyhow::Result<Head> {
        self.head
            .borrow()
            .clone()
            .ok_or_else(|| VitError::NotARepository(self.path.to_path_buf()).into())
    }

    pub fn set_head(&self, head: Head) -> anyhow::Result<()> {
        self.refs.set_head(&head)?;
        *self.head.borrow_mut() = Some(head);
        Ok(())
    }

    /// Commit HEAD resolves to; `None` until the first commit on the current branch
    pub fn head_commit(&self) -> anyhow::Result<Option<ObjectId>> {
        self.refs.head_commit(&self.head()?)
    }

    /// Like [`Repository::head_commit`] but failing with `NoCommits` on an unborn branch
    pub fn require_head_commit(&self) -> anyhow::Result<ObjectId> {
        self.head_commit()?
            .ok_or_else(|| VitError::NoCommits(self.head_name()).into())
    }

    pub fn current_branch(&self) -> anyhow::Result<Option<BranchName>> {
        self.refs.current_branch(&self.head()?)
    }

    /// Branch name when attached, `HEAD` otherwise
    pub fn head_name(&self) -> String {
        match self.head.borrow().as_ref() {
            Some(Head::Attached(branch)) => branch.to_string(),
            _ => "HEAD".to_string(),
        }
    }

    /// Move the current branch, or a detached HEAD, from `expected` to `oid`
    ///
    /// `expected` is the commit the caller read HEAD at; when another operation moved
    /// HEAD since, nothing is written and the call fails with `RefChanged`.
    pub fn advance_head(&self, expected: Option<&ObjectId>, oid: &ObjectId) -> anyhow::Result<()> {
        match self.head()? {
            Head::Attached(branch) => self.refs.update_branch(&branch, expected, oid),
            Head::Detached(current) => {
                let expected =
                    expected.ok_or_else(|| VitError::RefChanged(HEAD_REF_NAME.to_string()))?;
                if *expected != current {
                    return Err(VitError::RefChanged(HEAD_REF_NAME.to_string()).into());
                }

                self.refs.update_detached_head(expected, oid)?;
                *self.head.borrow_mut() = Some(Head::Detached(oid.clone()));
                Ok(())
            }
        }
    }

    /// Flattened tree of the HEAD commit, empty on an unborn branch
    pub fn head_listing(&self) -> anyhow::Result<TreeListing> {
        self.database
            .load_tree_entries(self.head_commit()?.as_ref())
    }

    /// Status of `index` (already loaded) against HEAD and the working tree
    ///
    /// Refreshed stat data is written back to the index file.
    pub fn collect_status(&self, index: &mut Index) -> anyhow::Result<StatusInfo> {
        let head_listing = self.head_listing()?;
        let mut status = self.status_inspector().collect(index, &head_listing)?;

        if self.refs.merge_head()?.is_some() {
            status.conflicted = self.status_inspector().conflicted_files(index);
        }
        if index.is_changed() {
            index.write_updates()?;
        }

        Ok(status)
    }

    /// Refuse with `DirtyWorkingTree` when tracked files have staged or unstaged changes
    pub fn ensure_clean(&self, index: &mut Index) -> anyhow::Result<()> {
        let status = self.collect_status(index)?;

        match status.is_clean() {
            true => Ok(()),
            false => Err(VitError::DirtyWorkingTree(status.changed_paths()).into()),
        }
    }

    /// Run the hook installed for `event`, if any
    ///
    /// A failing pre hook aborts with `HookRejected`; a post hook that fails, or cannot be
    /// started at all, is only logged.
    pub fn run_hook(&self, event: HookEvent, refs: Vec<String>) -> anyhow::Result<()> {
        let Some(script) = self.hooks.installed(event) else {
            return Ok(());
        };

        let context = HookContext::new(event, self.path.to_path_buf(), refs);
        let code = match (self.hook_runner.run(&script, &context), event.is_pre()) {
            (Ok(code), _) => code,
            (Err(err), true) => return Err(err),
            (Err(err), false) => {
                // The operation already happened; a post hook that cannot start only warns
                tracing::warn!(%event, error = %format!("{err:#}"), "hook could not run");
                return Ok(());
            }
        };
        tracing::debug!(%event, code, "hook finished");

        match (code, event.is_pre()) {
            (0, _) => Ok(()),
            (code, true) => Err(VitError::HookRejected {
                event: event.to_string(),
                code,
            }
            .into()),
            (code, false) => {
                tracing::warn!(%event, code, "hook failed");
                Ok(())
            }
        }
    }
}
