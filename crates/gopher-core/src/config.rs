//! Installation configuration.

use std::path::Component;
use std::path::Path;

use crate::SecurityError;
use crate::platform::TargetPlatform;
use crate::security::validate_path;

/// Default ceiling for a single extracted file (1 GiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Default ceiling for all extracted files together (8 GiB).
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 8 * 1024 * 1024 * 1024;

/// Default ceiling for the number of extracted entries.
pub const DEFAULT_MAX_FILE_COUNT: usize = 100_000;

/// Default top-level wrapper directory of Go distribution archives.
pub const DEFAULT_WRAPPER_PREFIX: &str = "go";

/// Configuration for extraction and installation.
///
/// Limits are checked against the sizes an archive *declares* for each
/// entry, before any content is copied.
///
/// # Examples
///
/// ```
/// use gopher_core::InstallConfig;
/// use gopher_core::platform::{Arch, Os, TargetPlatform};
///
/// // Use secure defaults for the host platform
/// let config = InstallConfig::default();
///
/// // Install a Windows toolchain with a tighter size limit
/// let custom = InstallConfig::default()
///     .with_platform(TargetPlatform::new(Os::Windows, Arch::Amd64))
///     .with_max_file_size(256 * 1024 * 1024);
/// assert_eq!(custom.max_file_size, 256 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Maximum declared size for a single file in bytes.
    pub max_file_size: u64,

    /// Maximum total size for all extracted files in bytes.
    pub max_total_size: u64,

    /// Maximum number of entries that can be extracted.
    pub max_file_count: usize,

    /// Top-level directory every entry is expected to live under. It is
    /// stripped from entry names during extraction.
    pub wrapper_prefix: String,

    /// Platform the toolchain is installed for.
    pub platform: TargetPlatform,
}

impl Default for InstallConfig {
    /// Creates an `InstallConfig` with default settings.
    ///
    /// Default values:
    /// - `max_file_size`: 1 GiB
    /// - `max_total_size`: 8 GiB
    /// - `max_file_count`: 100,000
    /// - `wrapper_prefix`: `"go"`
    /// - `platform`: the host platform
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            max_file_count: DEFAULT_MAX_FILE_COUNT,
            wrapper_prefix: DEFAULT_WRAPPER_PREFIX.to_string(),
            platform: TargetPlatform::current(),
        }
    }
}

impl InstallConfig {
    /// Sets the single-file size ceiling.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Sets the total size ceiling.
    #[must_use]
    pub fn with_max_total_size(mut self, bytes: u64) -> Self {
        self.max_total_size = bytes;
        self
    }

    /// Sets the entry count ceiling.
    #[must_use]
    pub fn with_max_file_count(mut self, count: usize) -> Self {
        self.max_file_count = count;
        self
    }

    /// Sets the required top-level wrapper directory.
    ///
    /// Trailing separators are dropped, so `"go/"` means `"go"`. An empty
    /// prefix disables the wrapper requirement.
    #[must_use]
    pub fn with_wrapper_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches(['/', '\\']);
        self.wrapper_prefix = if trimmed.is_empty() {
            prefix
        } else {
            trimmed.to_string()
        };
        self
    }

    /// Sets the target platform.
    #[must_use]
    pub fn with_platform(mut self, platform: TargetPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Checks that the configuration can drive an extraction.
    ///
    /// # Errors
    ///
    /// Returns a `SecurityError` if `wrapper_prefix` is neither empty nor a
    /// single plain path component.
    pub fn validate(&self) -> Result<(), SecurityError> {
        let prefix = self.wrapper_prefix.as_str();
        if prefix.is_empty() {
            return Ok(());
        }

        let path = Path::new(prefix);
        validate_path(path)?;

        let mut components = path.components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single || prefix.contains(['/', '\\']) {
            return Err(SecurityError::InvalidPath {
                path: path.to_path_buf(),
                reason: "wrapper prefix must be a single path component",
            });
        }
        Ok(())
    }
}
