//! Core utilities and shared types
//!
//! Atomic writes, temp names and the TOML registry helpers shared by the storage areas.

use crate::errors::VitError;
use anyhow::Context;
use fake::rand;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;

/// Generate a random name for a scratch file living next to its final destination.
pub fn generate_temp_name(prefix: &str) -> String {
    format!("tmp-{prefix}-{}", rand::random::<u32>())
}

/// Write `content` to `path` through a sibling temp file and a rename.
///
/// Readers observe either the previous content or the new one, never a partial write.
/// Filesystem failures surface as [`VitError::Io`].
pub fn write_atomically(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("invalid target path {}", path.display()))?;
    std::fs::create_dir_all(parent)
        .map_err(VitError::Io)
        .with_context(|| format!("unable to create directory {}", parent.display()))?;

    let temp_path = parent.join(generate_temp_name("write"));
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(VitError::Io)
        .with_context(|| format!("unable to open temp file {}", temp_path.display()))?;

    let written = file
        .write_all(content)
        .and_then(|_| file.sync_all())
        .and_then(|_| std::fs::rename(&temp_path, path));

    if let Err(err) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(VitError::Io(err))
            .with_context(|| format!("unable to write {}", path.display()));
    }

    Ok(())
}

/// Load a TOML registry file, the default value when the file does not exist yet
pub fn read_toml<T: DeserializeOwned + Default>(path: &Path) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => {
            return Err(VitError::Io(err))
                .with_context(|| format!("unable to read {}", path.display()));
        }
    };

    toml::from_str(&content).with_context(|| format!("{} is not valid TOML", path.display()))
}

pub fn write_toml<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(value)
        .with_context(|| format!("unable to serialize {}", path.display()))?;
    write_atomically(path, content.as_bytes())
}
