//! File materialization for scenario content.
//!
//! Exercise files are plain data: a relative path, UTF-8 text and an
//! optional executable bit. Writing them is deterministic, so running a
//! scenario twice produces byte-identical files.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{ProvisionError, Result};

/// A single file of an exercise, relative to the directory it is written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the target directory. Never absolute, never `..`.
    pub path: PathBuf,
    /// File content, newline-normalized to `\n`.
    pub content: String,
    /// Whether to set the executable bit (unix only).
    pub executable: bool,
}

impl FileEntry {
    /// Create a regular file entry.
    pub fn new(path: impl Into<PathBuf>, content: impl AsRef<str>) -> Self {
        Self {
            path: path.into(),
            content: normalize_newlines(content.as_ref()),
            executable: false,
        }
    }

    /// Create an executable file entry (scripts).
    pub fn executable(path: impl Into<PathBuf>, content: impl AsRef<str>) -> Self {
        Self {
            executable: true,
            ..Self::new(path, content)
        }
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Check that `path` stays inside whatever directory it is joined onto.
///
/// Rejects empty paths, absolute paths, drive prefixes and any `..`
/// component. `.` components are tolerated.
pub fn validate_relative(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ProvisionError::invalid_path(path, "path is empty"));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(ProvisionError::invalid_path(
                    path,
                    "path must not contain `..`",
                ));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ProvisionError::invalid_path(path, "path must be relative"));
            }
        }
    }
    Ok(())
}

/// Write every entry under `dir`, creating parent directories as needed.
///
/// All paths are validated before the first write so a bad entry never
/// leaves a half-written set of files behind.
pub fn materialize(dir: &Path, entries: &[FileEntry]) -> Result<Vec<PathBuf>> {
    for entry in entries {
        validate_relative(&entry.path)?;
    }

    let mut written = Vec::with_capacity(entries.len());
    for entry in entries {
        let target = dir.join(&entry.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ProvisionError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }
        fs::write(&target, entry.content.as_bytes())
            .map_err(|e| ProvisionError::io(format!("writing {}", target.display()), e))?;
        if entry.executable {
            set_executable(&target)?;
        }
        debug!(
            "Wrote {} ({} bytes{})",
            target.display(),
            entry.content.len(),
            if entry.executable { ", executable" } else { "" }
        );
        written.push(target);
    }
    Ok(written)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .map_err(|e| ProvisionError::io(format!("reading metadata of {}", path.display()), e))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .map_err(|e| ProvisionError::io(format!("setting mode of {}", path.display()), e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
