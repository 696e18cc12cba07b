//! Error types for toolchain installation.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `InstallError`.
pub type Result<T> = std::result::Result<T, InstallError>;

/// A path rejected by the path guard.
///
/// Every variant carries the offending input so the failure can be
/// diagnosed without re-running the operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// The path contains a parent-directory segment or resolves outside its
    /// root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The path that attempted traversal.
        path: PathBuf,
    },

    /// The path is empty or otherwise unusable.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The rejected path.
        path: PathBuf,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// The path contains a shell metacharacter or a literal `..` sequence.
    #[error("unsafe path {path:?}: contains {pattern:?}")]
    UnsafePath {
        /// The rejected path.
        path: PathBuf,
        /// The offending substring.
        pattern: String,
    },
}

impl SecurityError {
    /// Returns the path that was rejected.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathTraversal { path }
            | Self::InvalidPath { path, .. }
            | Self::UnsafePath { path, .. } => path,
        }
    }

    /// Replaces the reported path, keeping the rejection reason.
    pub(crate) fn with_path(self, path: PathBuf) -> Self {
        match self {
            Self::PathTraversal { .. } => Self::PathTraversal { path },
            Self::InvalidPath { reason, .. } => Self::InvalidPath { path, reason },
            Self::UnsafePath { pattern, .. } => Self::UnsafePath { path, pattern },
        }
    }
}

/// Represents a specific quota resource that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// Entry count quota exceeded.
    FileCount {
        /// Current entry count.
        current: usize,
        /// Maximum allowed entry count.
        max: usize,
    },
    /// Total size quota exceeded.
    TotalSize {
        /// Current total size in bytes.
        current: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// Single file size quota exceeded.
    FileSize {
        /// Declared file size in bytes.
        size: u64,
        /// Maximum allowed file size in bytes.
        max: u64,
    },
    /// Integer overflow detected in quota tracking.
    IntegerOverflow,
}

impl fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileCount { current, max } => {
                write!(f, "quota exceeded: file count ({current} > {max})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "quota exceeded: total size ({current} > {max})")
            }
            Self::FileSize { size, max } => {
                write!(f, "quota exceeded: single file size ({size} > {max})")
            }
            Self::IntegerOverflow => {
                write!(f, "quota exceeded: integer overflow in quota tracking")
            }
        }
    }
}

/// The step of an install or uninstall operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStep {
    /// Validating the version, source file, or install root.
    Validate,
    /// Extracting the archive into the staging directory.
    Extract,
    /// Writing the metadata sidecar.
    WriteMetadata,
    /// Moving the staged tree into its final location.
    Commit,
    /// Removing an installed tree.
    Remove,
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validate => "validate",
            Self::Extract => "extract",
            Self::WriteMetadata => "write metadata",
            Self::Commit => "commit",
            Self::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while installing or querying toolchains.
#[derive(Error, Debug)]
pub enum InstallError {
    /// I/O operation failed on a known path.
    #[error("{context}: {source}")]
    IoContext {
        /// What was being done, including the path.
        context: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A path was rejected by the path guard.
    #[error(transparent)]
    Security(#[from] SecurityError),

    /// Archive format is unrecognized.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The archive path.
        path: PathBuf,
    },

    /// Archive format is recognized but deliberately not handled here.
    #[error("{format} archives are not implemented: {path}")]
    NotImplemented {
        /// Human-readable name of the format.
        format: &'static str,
        /// The archive path.
        path: PathBuf,
    },

    /// Archive is corrupted or lies about its contents.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// An entry kind this installer refuses to extract.
    #[error("unsupported {kind} entry: {path}")]
    UnsupportedEntry {
        /// The entry name as stored in the archive.
        path: PathBuf,
        /// Entry kind description.
        kind: &'static str,
    },

    /// Extraction quota exceeded.
    #[error("{resource} at entry {path}")]
    QuotaExceeded {
        /// The entry that triggered the quota.
        path: PathBuf,
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },

    /// No archive entry carried the required top-level wrapper directory.
    #[error("archive does not have required prefix {prefix:?}")]
    MissingPrefix {
        /// The required wrapper directory name.
        prefix: String,
    },

    /// The archive never contained the runnable binary.
    #[error("archive is missing runnable binary {binary}")]
    MissingBinary {
        /// Expected location relative to the installation directory.
        binary: PathBuf,
    },

    /// The version is not installed.
    #[error("version {version} is not installed")]
    NotInstalled {
        /// The requested version.
        version: String,
    },

    /// The version directory exists but the binary is missing.
    #[error("go binary not found for version {version} at {path} (installation may be corrupted)")]
    BinaryNotFound {
        /// The requested version.
        version: String,
        /// Where the binary was expected.
        path: PathBuf,
    },

    /// A metadata sidecar could not be parsed.
    #[error("invalid metadata in {path}: {reason}")]
    InvalidMetadata {
        /// The sidecar path.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A step of an install or uninstall failed.
    #[error("{step} failed for version {version}: {source}")]
    Step {
        /// The version being operated on.
        version: String,
        /// The failing step.
        step: InstallStep,
        /// The underlying failure.
        #[source]
        source: Box<InstallError>,
    },
}

impl InstallError {
    /// Wraps an I/O error with the operation and path it concerned.
    pub(crate) fn io(op: &str, path: &Path, source: std::io::Error) -> Self {
        Self::IoContext {
            context: format!("failed to {op} {}", path.display()),
            source,
        }
    }

    /// Wraps this error as a failure of `step` for `version`.
    pub(crate) fn at_step(self, version: &str, step: InstallStep) -> Self {
        Self::Step {
            version: version.to_string(),
            step,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through `Step` wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Step { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns the security error underneath this one, if any.
    #[must_use]
    pub fn security_error(&self) -> Option<&SecurityError> {
        match self.root_cause() {
            Self::Security(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if this error represents a security violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use gopher_core::InstallError;
    /// use gopher_core::SecurityError;
    /// use std::path::PathBuf;
    ///
    /// let err = InstallError::from(SecurityError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// });
    /// assert!(err.is_security_violation());
    ///
    /// let err = InstallError::InvalidArchive("bad header".into());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub fn is_security_violation(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Security(_) | Self::QuotaExceeded { .. } | Self::UnsupportedEntry { .. }
        )
    }

    /// Returns `true` if the archive was readable but structurally wrong.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::UnsupportedFormat { .. }
                | Self::NotImplemented { .. }
                | Self::QuotaExceeded { .. }
                | Self::MissingPrefix { .. }
                | Self::MissingBinary { .. }
                | Self::UnsupportedEntry { .. }
        )
    }

    /// Returns `true` for installer-package archives that must be routed to
    /// a different install path.
    #[must_use]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self.root_cause(), Self::NotImplemented { .. })
    }

    /// Returns the quota resource that was exceeded, if applicable.
    #[must_use]
    pub fn quota_resource(&self) -> Option<&QuotaResource> {
        match self.root_cause() {
            Self::QuotaExceeded { resource, .. } => Some(resource),
            _ => None,
        }
    }
}
