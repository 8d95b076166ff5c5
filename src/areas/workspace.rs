use crate::areas::repository::METADATA_DIR;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::blob::Blob;
use crate::errors::VitError;
use anyhow::Context;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 1] = [METADATA_DIR];

/// The working tree: every file under the repository root except the metadata directory
///
/// Paths taken and returned are relative to the root.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::Normal(name) => IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()),
            _ => false,
        })
    }

    fn relative(&self, path: &Path) -> Option<PathBuf> {
        let relative = path.strip_prefix(&self.path).ok()?;
        match relative.as_os_str().is_empty() || Self::is_ignored(relative) {
            true => None,
            false => Some(relative.to_path_buf()),
        }
    }

    /// Files at or below `path`, sorted; an empty path or `.` lists the whole tree
    pub fn list_files(&self, path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let root = match path.as_os_str().is_empty() || path == Path::new(".") {
            true => self.path.to_path_buf(),
            false => self.path.join(path),
        };

        if !root.exists() {
            return Err(VitError::PathNotFound(path.to_path_buf()).into());
        }

        if root.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let mut files = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| {
                !Self::is_ignored(entry.path().strip_prefix(&self.path).unwrap_or(entry.path()))
            })
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.relative(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    /// Direct children of a directory, sorted
    pub fn list_dir(&self, dir_path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let full_path = self.path.join(dir_path);

        let mut children = std::fs::read_dir(&full_path)
            .map_err(VitError::Io)
            .with_context(|| format!("unable to list directory {}", full_path.display()))?
            .filter_map(Result::ok)
            .filter_map(|entry| self.relative(&entry.path()))
            .collect::<Vec<_>>();
        children.sort();

        Ok(children)
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.path.join(path).is_dir()
    }

    /// Whether any regular file exists at or below `path`
    pub fn contains_files(&self, path: &Path) -> bool {
        WalkDir::new(self.path.join(path))
            .into_iter()
            .filter_map(Result::ok)
            .any(|entry| entry.file_type().is_file())
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        match std::fs::read(self.path.join(file_path)) {
            Ok(content) => Ok(Bytes::from(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(VitError::PathNotFound(file_path.to_path_buf()).into())
            }
            Err(err) => Err(VitError::Io(err))
                .with_context(|| format!("unable to read {}", file_path.display())),
        }
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<EntryMetadata> {
        self.try_stat_file(file_path)?
            .ok_or_else(|| VitError::PathNotFound(file_path.to_path_buf()).into())
    }

    /// Stat data of a file or directory, `None` when nothing is there
    pub fn try_stat_file(&self, file_path: &Path) -> anyhow::Result<Option<EntryMetadata>> {
        let full_path = self.path.join(file_path);

        match std::fs::metadata(&full_path) {
            Ok(metadata) => Ok(Some((full_path.as_path(), metadata).try_into()?)),
            Err(err)
                if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) =>
            {
                Ok(None)
            }
            Err(err) => Err(VitError::Io(err))
                .with_context(|| format!("unable to stat {}", file_path.display())),
        }
    }

    /// Write a file, replacing whatever stands at its path or at one of its parents
    pub fn write_file(&self, file_path: &Path, data: &[u8], mode: EntryMode) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        for parent in file_path.ancestors().skip(1) {
            let parent = self.path.join(parent);
            if parent.is_file() {
                std::fs::remove_file(&parent).map_err(VitError::Io)?;
            }
        }
        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path).map_err(VitError::Io)?;
        }

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(VitError::Io)
                .with_context(|| format!("unable to create directory {}", parent.display()))?;
        }
        std::fs::write(&full_path, data)
            .map_err(VitError::Io)
            .with_context(|| format!("unable to write {}", file_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(match mode.is_executable() {
                true => 0o755,
                false => 0o644,
            });
            std::fs::set_permissions(&full_path, permissions)
                .map_err(VitError::Io)
                .with_context(|| format!("unable to set permissions of {}", file_path.display()))?;
        }

        Ok(())
    }

    /// Delete a file and any directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        match std::fs::remove_file(&full_path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                return Err(VitError::Io(err))
                    .with_context(|| format!("unable to remove {}", file_path.display()));
            }
        }

        for parent in file_path.ancestors().skip(1) {
            if parent.as_os_str().is_empty() {
                break;
            }
            // Stops at the first directory that still has content
            if std::fs::remove_dir(self.path.join(parent)).is_err() {
                break;
            }
        }

        Ok(())
    }
}
