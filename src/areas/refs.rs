//! References (branches, tags, HEAD)
//!
//! References are human-readable names pointing to commits.
//!
//! ## Layout
//!
//! - `HEAD`: a branch name (attached) or a 40-hex commit id (detached)
//! - `refs/heads/<name>`: branch tip commit id
//! - `refs/tags/<name>`: tagged commit id
//! - `MERGE_HEAD`, `MERGE_MSG`: present only while a conflicted merge awaits its commit
//!
//! Every write takes an exclusive lock on `<ref>.lock` and replaces the ref through a
//! temp file and a rename, so readers never see a partially written ref. Moving a branch
//! or a detached HEAD compares the current value with the one the caller started from
//! while the lock is held, and fails with `RefChanged` when another operation got there
//! first.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::write_atomically;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VitError;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

pub const HEAD_REF_NAME: &str = "HEAD";
const MERGE_HEAD_NAME: &str = "MERGE_HEAD";
const MERGE_MSG_NAME: &str = "MERGE_MSG";
const LOCK_SUFFIX: &str = ".lock";
const LOCK_ATTEMPTS: usize = 500;
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Where HEAD points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Attached(BranchName),
    Detached(ObjectId),
}

impl Head {
    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            Head::Attached(branch) => Some(branch),
            Head::Detached(_) => None,
        }
    }
}

impl std::fmt::Display for Head {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Head::Attached(branch) => write!(f, "{branch}"),
            Head::Detached(oid) => write!(f, "{oid}"),
        }
    }
}

/// Exclusive lock over one ref
///
/// The lock is the `<ref>.lock` file itself: it is created with `create_new`, so only one
/// holder can exist at a time, and removed on drop.
#[derive(Debug)]
pub struct RefLock {
    lock_path: PathBuf,
}

impl RefLock {
    pub fn acquire(ref_path: &Path) -> anyhow::Result<Self> {
        let parent = ref_path
            .parent()
            .with_context(|| format!("invalid ref path {}", ref_path.display()))?;
        std::fs::create_dir_all(parent).map_err(VitError::Io)?;

        let mut lock_name = ref_path.as_os_str().to_owned();
        lock_name.push(LOCK_SUFFIX);
        let lock_path = PathBuf::from(lock_name);

        for _ in 0..LOCK_ATTEMPTS {
            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
            {
                Ok(_) => return Ok(RefLock { lock_path }),
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    std::thread::sleep(LOCK_RETRY_DELAY);
                }
                Err(err) => {
                    return Err(VitError::Io(err))
                        .with_context(|| format!("unable to create lock {}", lock_path.display()));
                }
            }
        }

        Err(VitError::RefLocked(lock_path).into())
    }
}

impl Drop for RefLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.lock_path);
    }
}

/// Ref store rooted at the metadata directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (`.vit`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn tags_path(&self) -> PathBuf {
        self.refs_path().join("tags")
    }

    /// Read HEAD; `None` before `init` wrote it
    pub fn read_head(&self) -> anyhow::Result<Option<Head>> {
        let Some(content) = Self::read_trimmed(&self.head_path())? else {
            return Ok(None);
        };

        if ObjectId::is_full_hex(&content) {
            return Ok(Some(Head::Detached(ObjectId::try_parse(content)?)));
        }

        match BranchName::try_parse(content.as_str()) {
            Ok(branch) => Ok(Some(Head::Attached(branch))),
            Err(_) => Err(VitError::CorruptRef {
                name: HEAD_REF_NAME.to_string(),
                reason: format!("{content:?} is neither a branch name nor a commit id"),
            }
            .into()),
        }
    }

    pub fn set_head(&self, head: &Head) -> anyhow::Result<()> {
        tracing::debug!(%head, "moving HEAD");
        self.write_ref(&self.head_path(), &head.to_string())
    }

    /// Commit HEAD resolves to; `None` on an unborn branch
    pub fn head_commit(&self, head: &Head) -> anyhow::Result<Option<ObjectId>> {
        match head {
            Head::Attached(branch) => self.branch_commit(branch),
            Head::Detached(oid) => Ok(Some(oid.clone())),
        }
    }

    pub fn create_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref());
        let _lock = RefLock::acquire(&branch_path)?;

        if branch_path.exists() {
            return Err(VitError::RefAlreadyExists(name.to_string()).into());
        }

        write_atomically(&branch_path, oid.as_ref().as_bytes())
    }

    /// Move a branch from `expected` to `oid`
    ///
    /// `expected` is `None` for a branch that does not exist yet.
    pub fn update_branch(
        &self,
        name: &BranchName,
        expected: Option<&ObjectId>,
        oid: &ObjectId,
    ) -> anyhow::Result<()> {
        tracing::debug!(branch = %name, ?expected, %oid, "updating branch");
        let branch_path = self.heads_path().join(name.as_ref());
        let _lock = RefLock::acquire(&branch_path)?;

        let current = self.read_ref_file(&branch_path, name.as_ref())?;
        if current.as_ref() != expected {
            return Err(VitError::RefChanged(name.to_string()).into());
        }

        write_atomically(&branch_path, oid.as_ref().as_bytes())
    }

    /// Move a detached HEAD from `expected` to `oid`
    pub fn update_detached_head(&self, expected: &ObjectId, oid: &ObjectId) -> anyhow::Result<()> {
        tracing::debug!(%expected, %oid, "moving detached HEAD");
        let head_path = self.head_path();
        let _lock = RefLock::acquire(&head_path)?;

        if Self::read_trimmed(&head_path)?.as_deref() != Some(expected.as_ref()) {
            return Err(VitError::RefChanged(HEAD_REF_NAME.to_string()).into());
        }

        write_atomically(&head_path, oid.as_ref().as_bytes())
    }

    pub fn branch_commit(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref_file(&self.heads_path().join(name.as_ref()), name.as_ref())
    }

    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        self.list_refs(&self.heads_path())
    }

    /// Delete a branch that HEAD is not attached to, returning its last commit
    pub fn delete_branch(
        &self,
        name: &BranchName,
        head: Option<&Head>,
    ) -> anyhow::Result<ObjectId> {
        if let Some(Head::Attached(current)) = head
            && current == name
        {
            return Err(VitError::CurrentBranch(name.to_string()).into());
        }

        self.delete_ref(&self.heads_path(), name)
    }

    /// Branch HEAD is on
    ///
    /// A detached HEAD matches the first listed branch pointing at the same commit;
    /// when several do, listing order decides.
    pub fn current_branch(&self, head: &Head) -> anyhow::Result<Option<BranchName>> {
        match head {
            Head::Attached(branch) => Ok(Some(branch.clone())),
            Head::Detached(oid) => {
                for branch in self.list_branches()? {
                    if self.branch_commit(&branch)?.as_ref() == Some(oid) {
                        return Ok(Some(branch));
                    }
                }

                Ok(None)
            }
        }
    }

    pub fn create_tag(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        let tag_path = self.tags_path().join(name.as_ref());
        let _lock = RefLock::acquire(&tag_path)?;

        if tag_path.exists() {
            return Err(VitError::RefAlreadyExists(name.to_string()).into());
        }

        write_atomically(&tag_path, oid.as_ref().as_bytes())
    }

    pub fn tag_commit(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref_file(&self.tags_path().join(name.as_ref()), name.as_ref())
    }

    pub fn list_tags(&self) -> anyhow::Result<Vec<BranchName>> {
        self.list_refs(&self.tags_path())
    }

    pub fn delete_tag(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        self.delete_ref(&self.tags_path(), name)
    }

    pub fn merge_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref_file(&self.path.join(MERGE_HEAD_NAME), MERGE_HEAD_NAME)
    }

    pub fn merge_message(&self) -> anyhow::Result<Option<String>> {
        let path = self.path.join(MERGE_MSG_NAME);
        match std::fs::read_to_string(&path) {
            Ok(message) => Ok(Some(message)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(VitError::Io(err))
                .with_context(|| format!("unable to read {}", path.display())),
        }
    }

    /// Record a merge that stopped on conflicts
    pub fn set_merge_state(&self, theirs: &ObjectId, message: &str) -> anyhow::Result<()> {
        self.write_ref(&self.path.join(MERGE_HEAD_NAME), theirs.as_ref())?;
        write_atomically(&self.path.join(MERGE_MSG_NAME), message.as_bytes())
    }

    pub fn clear_merge_state(&self) -> anyhow::Result<()> {
        for name in [MERGE_HEAD_NAME, MERGE_MSG_NAME] {
            let path = self.path.join(name);
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(VitError::Io(err))
                        .with_context(|| format!("unable to remove {}", path.display()));
                }
            }
        }

        Ok(())
    }

    fn write_ref(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        let _lock = RefLock::acquire(path)?;
        write_atomically(path, content.as_bytes())
    }

    fn read_trimmed(path: &Path) -> anyhow::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(VitError::Io(err)).with_context(|| format!("unable to read {}", path.display()))
            }
        }
    }

    fn read_ref_file(&self, path: &Path, name: &str) -> anyhow::Result<Option<ObjectId>> {
        if path.is_dir() {
            return Ok(None);
        }
        let Some(content) = Self::read_trimmed(path)? else {
            return Ok(None);
        };

        if !ObjectId::is_full_hex(&content) {
            return Err(VitError::CorruptRef {
                name: name.to_string(),
                reason: format!("{content:?} is not a commit id"),
            }
            .into());
        }

        Ok(Some(ObjectId::try_parse(content)?))
    }

    fn delete_ref(&self, base: &Path, name: &BranchName) -> anyhow::Result<ObjectId> {
        let ref_path = base.join(name.as_ref());
        let lock = RefLock::acquire(&ref_path)?;

        let oid = self
            .read_ref_file(&ref_path, name.as_ref())?
            .ok_or_else(|| VitError::RefNotFound(name.to_string()))?;
        std::fs::remove_file(&ref_path)
            .map_err(VitError::Io)
            .with_context(|| format!("unable to delete ref {}", ref_path.display()))?;
        drop(lock);

        self.prune_empty_parent_dirs(base, &ref_path)?;
        Ok(oid)
    }

    fn list_refs(&self, base: &Path) -> anyhow::Result<Vec<BranchName>> {
        let mut names = WalkDir::new(base)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(base).ok()?;
                BranchName::try_parse(relative.to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    fn prune_empty_parent_dirs(&self, base: &Path, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != base
            && parent.starts_with(base)
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty ref directory at {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(base, parent)?;
        }

        Ok(())
    }
}
