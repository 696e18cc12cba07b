//! Toolchain installation, removal, and queries.

use std::collections::BTreeMap;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;
use tracing::warn;
use walkdir::WalkDir;

use crate::InstallConfig;
use crate::InstallError;
use crate::InstallStep;
use crate::Result;
use crate::SecurityError;
use crate::extraction::ExtractionEngine;
use crate::extraction::ExtractionOutcome;
use crate::extraction::StagingDir;
use crate::extraction::atomic::is_internal_name;
use crate::extraction::atomic::remove_tree;
use crate::metadata;
use crate::metadata::InstallMetadata;
use crate::metadata::METADATA_FILE;
use crate::report::InstallProgress;
use crate::report::InstallReport;
use crate::report::NoopProgress;
use crate::security::clean_path;
use crate::security::validate_directory_path;
use crate::security::validate_path;
use crate::security::validate_path_within_root;

/// Installs and manages toolchain versions below one install root.
///
/// Every installed version lives in `<root>/<version>/`. Installation is
/// staged inside the root and renamed into place, so a version directory
/// either does not exist or holds a complete, verified tree.
///
/// # Examples
///
/// ```no_run
/// use gopher_core::InstallConfig;
/// use gopher_core::Installer;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let installer = Installer::new("/opt/gopher", InstallConfig::default())?;
/// installer.install("1.22.1", Path::new("go1.22.1.linux-amd64.tar.gz"))?;
///
/// let go = installer.go_binary_path("1.22.1")?;
/// println!("go is at {}", go.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Installer {
    root: PathBuf,
    config: InstallConfig,
}

impl Installer {
    /// Creates an installer for `root`.
    ///
    /// The root is made absolute but not created; `install` creates it.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` fails path validation or cannot be made
    /// absolute, or if `config` carries an invalid wrapper prefix.
    pub fn new(root: impl AsRef<Path>, config: InstallConfig) -> Result<Self> {
        let root = root.as_ref();
        validate_directory_path(root)?;
        config.validate()?;

        let absolute = std::path::absolute(root).map_err(|_| SecurityError::InvalidPath {
            path: root.to_path_buf(),
            reason: "path cannot be made absolute",
        })?;

        Ok(Self {
            root: clean_path(&absolute),
            config,
        })
    }

    /// Returns the install root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory `version` is (or would be) installed in.
    ///
    /// # Errors
    ///
    /// Returns an error if `version` is not a safe single path component.
    pub fn version_dir(&self, version: &str) -> Result<PathBuf> {
        validate_version(version)?;
        let dir = validate_path_within_root(&self.root.join(version), &self.root)?;
        Ok(dir.into_path_buf())
    }

    /// Installs `version` from the archive at `source`.
    ///
    /// # Errors
    ///
    /// Returns `InstallError::Step` naming the version and the failing step.
    /// On error no previous installation of `version` is modified.
    pub fn install(&self, version: &str, source: &Path) -> Result<InstallReport> {
        self.install_with_progress(version, source, &mut NoopProgress)
    }

    /// Installs `version` from the archive at `source`, reporting progress.
    ///
    /// # Errors
    ///
    /// See [`install`](Self::install).
    pub fn install_with_progress(
        &self,
        version: &str,
        source: &Path,
        progress: &mut dyn InstallProgress,
    ) -> Result<InstallReport> {
        info!(version, archive = %source.display(), "installing toolchain");

        let target = self
            .prepare_install(version, source)
            .map_err(|e| e.at_step(version, InstallStep::Validate))?;

        progress.on_extraction_start(version, source);
        let (staging, outcome) = self
            .extract_staged(source)
            .map_err(|e| e.at_step(version, InstallStep::Extract))?;
        progress.on_extraction_complete(version, &outcome.report);

        progress.on_metadata_start(version);
        InstallMetadata::new(version, &self.config.platform, &target)
            .write_into(staging.path())
            .map_err(|e| e.at_step(version, InstallStep::WriteMetadata))?;
        progress.on_metadata_complete(version);

        let replaced = staging
            .commit(&target)
            .map_err(|e| e.at_step(version, InstallStep::Commit))?;

        info!(
            version,
            dir = %target.display(),
            files = outcome.report.files_extracted,
            bytes = outcome.report.bytes_written,
            replaced,
            "installed toolchain"
        );

        Ok(InstallReport {
            version: version.to_string(),
            metadata_path: target.join(METADATA_FILE),
            install_dir: target,
            replaced,
            extraction: outcome.report,
        })
    }

    /// Removes an installed version.
    ///
    /// # Errors
    ///
    /// - `InstallError::NotInstalled` if the version is not installed
    /// - `InstallError::Step` if validation or removal fails
    pub fn uninstall(&self, version: &str) -> Result<()> {
        let target = self
            .version_dir(version)
            .map_err(|e| e.at_step(version, InstallStep::Validate))?;
        if !target.is_dir() {
            return Err(InstallError::NotInstalled {
                version: version.to_string(),
            });
        }

        remove_tree(&target).map_err(|e| e.at_step(version, InstallStep::Remove))?;
        info!(version, dir = %target.display(), "uninstalled toolchain");
        Ok(())
    }

    /// Returns `true` if a directory exists for `version`.
    ///
    /// This is an existence check only; the tree is not inspected.
    #[must_use]
    pub fn is_installed(&self, version: &str) -> bool {
        self.version_dir(version).is_ok_and(|dir| dir.is_dir())
    }

    /// Lists installed versions in directory enumeration order.
    ///
    /// Returns an empty list if the install root does not exist. The
    /// installer's own staging and trash directories are never listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the install root cannot be read.
    pub fn list_installed(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(InstallError::io("read", &self.root, e)),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| InstallError::io("read", &self.root, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| InstallError::io("stat", &entry.path(), e))?;
            if !file_type.is_dir() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 directory name");
                continue;
            };
            if is_internal_name(&name) {
                debug!(name = %name, "skipping internal directory");
                continue;
            }
            versions.push(name);
        }

        Ok(versions)
    }

    /// Returns the metadata recorded for `version`.
    ///
    /// # Errors
    ///
    /// - `InstallError::NotInstalled` if the version is not installed
    /// - an I/O or metadata error if the sidecar cannot be read
    pub fn version_metadata(&self, version: &str) -> Result<BTreeMap<String, String>> {
        let dir = self.installed_dir(version)?;
        metadata::read_from(&dir)
    }

    /// Returns the path of the runnable `go` binary of `version`.
    ///
    /// # Errors
    ///
    /// - `InstallError::NotInstalled` if the version is not installed
    /// - `InstallError::BinaryNotFound` if the version directory exists but
    ///   the binary does not
    pub fn go_binary_path(&self, version: &str) -> Result<PathBuf> {
        let dir = self.installed_dir(version)?;
        let binary = dir.join(self.config.platform.go_binary());
        if binary.is_file() {
            Ok(binary)
        } else {
            Err(InstallError::BinaryNotFound {
                version: version.to_string(),
                path: binary,
            })
        }
    }

    /// Returns the total size in bytes of the files of `version`.
    ///
    /// # Errors
    ///
    /// - `InstallError::NotInstalled` if the version is not installed
    /// - an I/O error if the tree cannot be walked
    pub fn disk_usage(&self, version: &str) -> Result<u64> {
        let dir = self.installed_dir(version)?;

        let mut total: u64 = 0;
        for entry in WalkDir::new(&dir) {
            let entry = entry.map_err(|e| InstallError::io("walk", &dir, e.into()))?;
            if entry.file_type().is_file() {
                let metadata = entry
                    .metadata()
                    .map_err(|e| InstallError::io("stat", entry.path(), e.into()))?;
                total = total.saturating_add(metadata.len());
            }
        }
        Ok(total)
    }

    fn installed_dir(&self, version: &str) -> Result<PathBuf> {
        let dir = self.version_dir(version)?;
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(InstallError::NotInstalled {
                version: version.to_string(),
            })
        }
    }

    fn prepare_install(&self, version: &str, source: &Path) -> Result<PathBuf> {
        let target = self.version_dir(version)?;

        validate_path(source)?;
        let source_metadata =
            fs::metadata(source).map_err(|e| InstallError::io("read", source, e))?;
        if !source_metadata.is_file() {
            return Err(InstallError::InvalidArchive(format!(
                "{} is not a regular file",
                source.display()
            )));
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| InstallError::io("create directory", &self.root, e))?;
        Ok(target)
    }

    fn extract_staged(&self, source: &Path) -> Result<(StagingDir, ExtractionOutcome)> {
        let staging = StagingDir::new_in(&self.root)?;
        let outcome =
            ExtractionEngine::new(self.config.clone()).extract_verified(source, staging.path())?;
        debug!(
            files = outcome.report.files_extracted,
            directories = outcome.report.directories_created,
            "staged tree verified"
        );
        Ok((staging, outcome))
    }
}

/// Checks that `version` can be used as a directory name below the root.
///
/// # Errors
///
/// Returns a `SecurityError` if the version fails [`validate_path`], is not
/// exactly one plain path component, contains control characters, or
/// collides with the installer's internal directory names.
pub fn validate_version(version: &str) -> std::result::Result<(), SecurityError> {
    let path = Path::new(version);
    validate_path(path)?;

    let mut components = path.components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || version.contains(['/', '\\']) {
        return Err(SecurityError::InvalidPath {
            path: path.to_path_buf(),
            reason: "version must be a single path component",
        });
    }

    if version.chars().any(char::is_control) {
        return Err(SecurityError::InvalidPath {
            path: path.to_path_buf(),
            reason: "version contains control characters",
        });
    }

    if is_internal_name(version) {
        return Err(SecurityError::InvalidPath {
            path: path.to_path_buf(),
            reason: "version collides with an internal directory name",
        });
    }

    Ok(())
}
