//! Staging directories and rename-based replacement.
//!
//! Archives are extracted into a hidden directory inside the install root.
//! Only a fully extracted and verified tree is renamed onto its final name,
//! so readers never see a partial installation. Replaced and removed trees
//! are first renamed into a hidden trash directory and deleted from there.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;
use tracing::debug;
use tracing::warn;

use crate::InstallError;
use crate::Result;
use crate::SecurityError;

/// Name prefix shared by every directory the installer manages internally.
pub const INTERNAL_PREFIX: &str = ".gopher-";

/// Name prefix of staging directories.
pub const STAGING_PREFIX: &str = ".gopher-staging-";

/// Name prefix of trash directories.
pub const TRASH_PREFIX: &str = ".gopher-trash-";

/// Returns `true` if `name` belongs to a directory the installer manages
/// internally.
#[must_use]
pub fn is_internal_name(name: &str) -> bool {
    name.starts_with(INTERNAL_PREFIX)
}

/// A staging directory that is deleted unless committed.
#[derive(Debug)]
pub struct StagingDir {
    dir: TempDir,
}

impl StagingDir {
    /// Creates a fresh staging directory inside `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new_in(root: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(root)
            .map_err(|e| InstallError::io("create staging directory in", root, e))?;
        debug!(staging = %dir.path().display(), "created staging directory");
        Ok(Self { dir })
    }

    /// Returns the staging directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Moves the staged tree to `target`.
    ///
    /// An existing tree at `target` is renamed into a trash directory first
    /// and deleted after the staged tree is in place. If the staged tree
    /// cannot be moved, the previous tree is moved back.
    ///
    /// Returns `true` if an existing tree was replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if either rename fails. On error `target` holds the
    /// previous tree (or nothing, if there was none) and the staging
    /// directory is deleted.
    pub fn commit(self, target: &Path) -> Result<bool> {
        if !target.exists() {
            fs::rename(self.dir.path(), target)
                .map_err(|e| InstallError::io("move staged tree to", target, e))?;
            let _ = self.dir.keep();
            return Ok(false);
        }

        let trash = TrashDir::new_for(target)?;
        let parked = trash.park(target)?;

        if let Err(e) = fs::rename(self.dir.path(), target) {
            if let Err(restore) = fs::rename(&parked, target) {
                warn!(
                    target = %target.display(),
                    parked = %parked.display(),
                    error = %restore,
                    "failed to restore previous installation"
                );
                let _ = trash.dir.keep();
            }
            return Err(InstallError::io("move staged tree to", target, e));
        }
        let _ = self.dir.keep();

        if let Err(e) = trash.purge() {
            warn!(error = %e, "failed to delete replaced installation");
        }
        Ok(true)
    }
}

/// Removes the tree at `target`.
///
/// The tree disappears from its name with a single rename before any file
/// is deleted.
///
/// # Errors
///
/// Returns an error if the rename or the deletion fails. After a failed
/// deletion the tree is no longer reachable under `target`; the error
/// names the directory that still holds it.
pub fn remove_tree(target: &Path) -> Result<()> {
    let trash = TrashDir::new_for(target)?;
    trash.park(target)?;
    trash.purge()
}

/// A hidden directory next to a tree that is about to be deleted.
struct TrashDir {
    dir: TempDir,
}

impl TrashDir {
    fn new_for(target: &Path) -> Result<Self> {
        let parent = target.parent().ok_or_else(|| SecurityError::InvalidPath {
            path: target.to_path_buf(),
            reason: "path has no parent directory",
        })?;
        let dir = tempfile::Builder::new()
            .prefix(TRASH_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| InstallError::io("create trash directory in", parent, e))?;
        Ok(Self { dir })
    }

    /// Renames `target` into the trash and returns its new path.
    fn park(&self, target: &Path) -> Result<PathBuf> {
        let parked = self.dir.path().join("tree");
        fs::rename(target, &parked).map_err(|e| InstallError::io("move aside", target, e))?;
        Ok(parked)
    }

    fn purge(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|e| InstallError::io("delete", &path, e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn entries(root: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_staging_dir_is_hidden_and_removed_on_drop() {
        let root = TempDir::new().expect("failed to create temp dir");
        let staging = StagingDir::new_in(root.path()).unwrap();
        let path = staging.path().to_path_buf();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(STAGING_PREFIX));
        assert!(is_internal_name(&name));

        drop(staging);
        assert!(!path.exists());
    }

    #[test]
    fn test_commit_into_empty_slot() {
        let root = TempDir::new().expect("failed to create temp dir");
        let staging = StagingDir::new_in(root.path()).unwrap();
        fs::write(staging.path().join("VERSION"), "go1.22.1").unwrap();

        let target = root.path().join("1.22.1");
        assert!(!staging.commit(&target).unwrap());

        assert_eq!(fs::read_to_string(target.join("VERSION")).unwrap(), "go1.22.1");
        assert_eq!(entries(root.path()), vec!["1.22.1"]);
    }

    #[test]
    fn test_commit_replaces_existing_tree() {
        let root = TempDir::new().expect("failed to create temp dir");
        let target = root.path().join("1.22.1");
        fs::create_dir_all(target.join("old")).unwrap();
        fs::write(target.join("old/file"), "old").unwrap();

        let staging = StagingDir::new_in(root.path()).unwrap();
        fs::write(staging.path().join("new"), "new").unwrap();
        assert!(staging.commit(&target).unwrap());

        assert!(target.join("new").is_file());
        assert!(!target.join("old").exists());
        assert_eq!(entries(root.path()), vec!["1.22.1"]);
    }

    #[test]
    fn test_remove_tree() {
        let root = TempDir::new().expect("failed to create temp dir");
        let target = root.path().join("1.21.0");
        fs::create_dir_all(target.join("bin")).unwrap();
        fs::write(target.join("bin/go"), "go").unwrap();

        remove_tree(&target).unwrap();
        assert!(!target.exists());
        assert!(entries(root.path()).is_empty());
    }

    #[test]
    fn test_remove_missing_tree_fails() {
        let root = TempDir::new().expect("failed to create temp dir");
        let err = remove_tree(&root.path().join("absent")).unwrap_err();
        assert!(matches!(err, InstallError::IoContext { .. }));
        assert!(entries(root.path()).is_empty());
    }
}
