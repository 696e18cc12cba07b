//! Path proven to resolve inside a root directory.

use std::path::Path;
use std::path::PathBuf;

/// An absolute, lexically clean path that resolves inside a root directory.
///
/// `ContainedPath` represents the result of a successful containment check.
///
/// # Security Properties
///
/// - Can ONLY be constructed by
///   [`validate_path_within_root`](crate::security::validate_path_within_root)
/// - NO `From<PathBuf>` implementation (security critical)
/// - Never contains `.` or `..` components
///
/// # Examples
///
/// ```
/// use gopher_core::security::validate_path_within_root;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let contained = validate_path_within_root(
///     Path::new("/opt/gopher/1.21.0/bin/go"),
///     Path::new("/opt/gopher"),
/// )?;
/// assert_eq!(contained.relative(), Path::new("1.21.0/bin/go"));
///
/// assert!(validate_path_within_root(
///     Path::new("/opt/gopher/../etc/passwd"),
///     Path::new("/opt/gopher"),
/// )
/// .is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainedPath {
    absolute: PathBuf,
    relative: PathBuf,
}

impl ContainedPath {
    /// Creates a `ContainedPath` without validation (INTERNAL USE ONLY).
    ///
    /// The caller MUST have verified that `absolute` is clean and equals the
    /// root joined with `relative`.
    pub(crate) fn new_unchecked(absolute: PathBuf, relative: PathBuf) -> Self {
        Self { absolute, relative }
    }

    /// Returns the resolved absolute path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.absolute
    }

    /// Returns the path relative to the root it was checked against.
    ///
    /// Empty when the path is the root itself.
    #[inline]
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Returns `true` if the path is the root itself.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }

    /// Converts into the resolved absolute `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.absolute
    }
}

impl AsRef<Path> for ContainedPath {
    fn as_ref(&self) -> &Path {
        &self.absolute
    }
}
