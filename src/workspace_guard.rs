//! Destructive-reset protection for exercise directories
//!
//! A learner may have work in progress inside an exercise directory, so an
//! existing directory is only ever deleted when `--force` is given. When a
//! scenario owns several directories (a bare "remote" beside the learner's
//! clone), every one of them is checked before any of them is touched: the
//! guard either fails with the filesystem untouched or resets all of them.
//!
//! The existence check and the deletion are not atomic. Two concurrent runs
//! of the same scenario can collide; that is accepted for a single-operator CLI.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ProvisionError, Result};

/// On-disk state of a guarded path, re-derived on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceState {
    Absent,
    Present,
}

/// What the guard did to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The path did not exist and was created empty.
    Created,
    /// The path existed, was deleted and created again empty.
    Recreated,
}

/// Look at a path without modifying anything.
pub fn inspect(path: &Path) -> WorkspaceState {
    // symlink_metadata so a dangling symlink still counts as present
    if fs::symlink_metadata(path).is_ok() {
        WorkspaceState::Present
    } else {
        WorkspaceState::Absent
    }
}

/// Guard a single directory. See [`ensure_clean_all`].
pub fn ensure_clean(path: &Path, force: bool) -> Result<GuardOutcome> {
    let outcomes = ensure_clean_all(&[path.to_path_buf()], force)?;
    Ok(outcomes[0])
}

/// Make every path an empty directory, all or nothing.
///
/// - Any path present and `force` false: `AlreadyExists` for the first such
///   path, nothing is modified.
/// - Otherwise present paths are deleted and every path is created empty.
pub fn ensure_clean_all(paths: &[PathBuf], force: bool) -> Result<Vec<GuardOutcome>> {
    let states: Vec<WorkspaceState> = paths.iter().map(|p| inspect(p)).collect();

    if !force {
        if let Some((path, _)) = paths
            .iter()
            .zip(&states)
            .find(|(_, state)| **state == WorkspaceState::Present)
        {
            info!("Refusing to reset existing {} without --force", path.display());
            return Err(ProvisionError::AlreadyExists { path: path.clone() });
        }
    }

    let mut outcomes = Vec::with_capacity(paths.len());
    for (path, state) in paths.iter().zip(states) {
        let outcome = match state {
            WorkspaceState::Present => {
                info!("Removing existing {}", path.display());
                remove_path(path)?;
                GuardOutcome::Recreated
            }
            WorkspaceState::Absent => GuardOutcome::Created,
        };
        fs::create_dir_all(path)
            .map_err(|e| ProvisionError::io(format!("creating {}", path.display()), e))?;
        debug!("Guarded {} -> {:?}", path.display(), outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Delete a file, symlink or directory tree.
pub fn remove_path(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path)
        .map_err(|e| ProvisionError::io(format!("inspecting {}", path.display()), e))?;
    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| ProvisionError::io(format!("removing {}", path.display()), e))
}

/// A throwaway directory used to seed or push to a bare remote.
///
/// Leftovers from an interrupted run are removed on creation, and the
/// directory is removed again on drop, whether the steps using it
/// succeeded or not.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Remove any leftover at `path`. The directory itself is not created,
    /// since `git clone` wants to create its destination.
    pub fn claim(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if inspect(&path) == WorkspaceState::Present {
            debug!("Removing leftover scratch directory {}", path.display());
            remove_path(&path)?;
        }
        Ok(Self { path })
    }

    /// Path of the scratch directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if inspect(&self.path) == WorkspaceState::Present {
            if let Err(e) = remove_path(&self.path) {
                warn!("Failed to remove scratch directory {}: {}", self.path.display(), e);
            } else {
                debug!("Removed scratch directory {}", self.path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_absent_path_is_created() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("ex01-init");
        assert_eq!(ensure_clean(&target, false).unwrap(), GuardOutcome::Created);
        assert!(target.is_dir());
    }

    #[test]
    fn test_present_without_force_is_untouched() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("ex01-init");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("work.txt"), "learner work").unwrap();

        let err = ensure_clean(&target, false).unwrap_err();
        assert!(matches!(err, ProvisionError::AlreadyExists { .. }));
        assert_eq!(
            fs::read_to_string(target.join("work.txt")).unwrap(),
            "learner work"
        );
    }

    #[test]
    fn test_present_with_force_is_emptied() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("ex01-init");
        fs::create_dir_all(target.join("nested")).unwrap();
        fs::write(target.join("nested/file.txt"), "old").unwrap();

        assert_eq!(ensure_clean(&target, true).unwrap(), GuardOutcome::Recreated);
        assert!(target.is_dir());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_all_paths_checked_before_any_mutation() {
        let tmp = TempDir::new().unwrap();
        let remote = tmp.path().join("remote-repo.git");
        let clone = tmp.path().join("ex15-remote");
        // only the second path exists
        fs::create_dir(&clone).unwrap();
        fs::write(clone.join("keep.txt"), "keep").unwrap();

        let err = ensure_clean_all(&[remote.clone(), clone.clone()], false).unwrap_err();
        match err {
            ProvisionError::AlreadyExists { path } => assert_eq!(path, clone),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!remote.exists(), "first path must not be created on failure");
        assert!(clone.join("keep.txt").exists());
    }

    #[test]
    fn test_existing_file_is_replaced_by_directory_with_force() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("ex02-ignore");
        fs::write(&target, "not a directory").unwrap();
        ensure_clean(&target, true).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("_temp_init");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("leftover"), "x").unwrap();

        {
            let scratch = ScratchDir::claim(&path).unwrap();
            assert!(!scratch.path().exists(), "leftover must be cleared");
            fs::create_dir(scratch.path()).unwrap();
        }
        assert!(!path.exists());
    }
}
