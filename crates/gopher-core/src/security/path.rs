//! Path validation and confinement.
//!
//! Every path the installer hands to the filesystem goes through one of the
//! functions in this module first. Archive entry names, version identifiers,
//! and the install root are all treated as untrusted.
//!
//! The checks are lexical: symlinks are not resolved. Extraction only ever
//! writes into a freshly created staging directory and never creates
//! symlinks, so no link can exist beneath a containment root while it is
//! being written.

use std::borrow::Cow;
use std::path::Component;
use std::path::MAIN_SEPARATOR;
use std::path::Path;
use std::path::PathBuf;

use crate::error::SecurityError;
use crate::types::ContainedPath;

/// Substrings that are never allowed in a path.
///
/// A `..` that forms a whole path segment is reported as traversal before
/// this list is consulted; what remains here are `..` runs embedded in a
/// name such as `a..b`.
const UNSAFE_PATTERNS: [&str; 11] = ["..", "~", "$", "`", "|", "&", ";", "(", ")", "<", ">"];

/// Characters removed by [`sanitize_path`].
const UNSAFE_CHARS: [char; 10] = ['~', '$', '`', '|', '&', ';', '(', ')', '<', '>'];

/// Validates a path before it reaches a filesystem call.
///
/// Absolute paths are accepted; callers that need confinement must use
/// [`validate_path_within_root`].
///
/// # Errors
///
/// - `SecurityError::InvalidPath` if the path is empty or contains a NUL
///   byte
/// - `SecurityError::PathTraversal` if any segment is `..`
/// - `SecurityError::UnsafePath` if the path contains a shell
///   metacharacter (one of ``~ $ ` | & ; ( ) < >``) or an embedded `..`
///
/// # Examples
///
/// ```
/// use gopher_core::SecurityError;
/// use gopher_core::security::validate_path;
/// use std::path::Path;
///
/// assert!(validate_path(Path::new("go/bin/go")).is_ok());
/// assert!(matches!(
///     validate_path(Path::new("go/../../etc/passwd")),
///     Err(SecurityError::PathTraversal { .. })
/// ));
/// assert!(matches!(
///     validate_path(Path::new("go/$(reboot)")),
///     Err(SecurityError::UnsafePath { .. })
/// ));
/// ```
pub fn validate_path(path: &Path) -> Result<(), SecurityError> {
    if path.as_os_str().is_empty() {
        return Err(SecurityError::InvalidPath {
            path: PathBuf::new(),
            reason: "path is empty",
        });
    }

    let text = path.to_string_lossy();
    if text.contains('\0') {
        return Err(SecurityError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path contains a NUL byte",
        });
    }

    if path
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(SecurityError::PathTraversal {
            path: path.to_path_buf(),
        });
    }

    if let Some(pattern) = UNSAFE_PATTERNS
        .iter()
        .find(|pattern| text.contains(*pattern))
    {
        return Err(SecurityError::UnsafePath {
            path: path.to_path_buf(),
            pattern: (*pattern).to_string(),
        });
    }

    Ok(())
}

/// Validates a directory path. Trailing separators are tolerated.
///
/// # Errors
///
/// Same as [`validate_path`].
pub fn validate_directory_path(path: &Path) -> Result<(), SecurityError> {
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches(['/', MAIN_SEPARATOR]);
    if trimmed.is_empty() && !text.is_empty() {
        // Filesystem root; nothing to strip.
        return validate_path(path);
    }
    validate_path(Path::new(trimmed))
}

/// Resolves `path` and proves that it lies inside `root`.
///
/// Both paths are made absolute against the current directory and cleaned
/// lexically before comparison. This is the containment primitive used for
/// every write the extractor performs and for metadata reads and writes.
///
/// # Errors
///
/// - Any error of [`validate_path`] for `path`
/// - `SecurityError::InvalidPath` if either path cannot be made absolute
/// - `SecurityError::PathTraversal` if the resolved path is not `root` or a
///   descendant of it
///
/// # Examples
///
/// ```
/// use gopher_core::SecurityError;
/// use gopher_core::security::validate_path_within_root;
/// use std::path::Path;
///
/// let root = Path::new("/srv/go");
/// assert!(validate_path_within_root(Path::new("/srv/go/1.22.1"), root).is_ok());
/// assert!(matches!(
///     validate_path_within_root(Path::new("/srv/go/a/../../etc/passwd"), root),
///     Err(SecurityError::PathTraversal { .. })
/// ));
/// assert!(matches!(
///     validate_path_within_root(Path::new("/srv/golang"), root),
///     Err(SecurityError::PathTraversal { .. })
/// ));
/// ```
pub fn validate_path_within_root(path: &Path, root: &Path) -> Result<ContainedPath, SecurityError> {
    validate_path(path)?;

    let resolved = resolve(path)?;
    let resolved_root = resolve(root)?;

    match resolved.strip_prefix(&resolved_root) {
        Ok(relative) => {
            let relative = relative.to_path_buf();
            Ok(ContainedPath::new_unchecked(resolved, relative))
        }
        Err(_) => Err(SecurityError::PathTraversal {
            path: path.to_path_buf(),
        }),
    }
}

/// Strips traversal sequences and shell metacharacters for display.
///
/// This is NOT a security boundary: the result must still pass
/// [`validate_path_within_root`] before it is used for any filesystem write.
///
/// # Examples
///
/// ```
/// use gopher_core::security::sanitize_path;
/// use std::path::PathBuf;
///
/// assert_eq!(sanitize_path("../../etc/passwd"), PathBuf::from("etc/passwd"));
/// assert_eq!(sanitize_path("~/sdk/$go"), PathBuf::from("sdk").join("go"));
/// ```
#[must_use]
pub fn sanitize_path(path: &str) -> PathBuf {
    path.split(['/', '\\'])
        .map(|segment| {
            let stripped: String = segment.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect();
            stripped.replace("..", "")
        })
        .filter(|segment| !segment.is_empty() && segment != ".")
        .collect()
}

/// Normalizes a path lexically.
///
/// Removes `.` segments and folds `name/..` pairs. Leading `..` segments of
/// relative paths are kept; `..` directly below the root of an absolute path
/// is dropped. An empty result becomes `.`.
///
/// # Examples
///
/// ```
/// use gopher_core::security::clean_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(clean_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
/// assert_eq!(clean_path(Path::new("../a")), PathBuf::from("../a"));
/// assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
/// assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
/// ```
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.last() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => cleaned.push(component),
            },
            other => cleaned.push(other),
        }
    }

    if cleaned.is_empty() {
        return PathBuf::from(".");
    }
    cleaned.iter().collect()
}

/// Makes `path` absolute and clean.
fn resolve(path: &Path) -> Result<PathBuf, SecurityError> {
    let absolute = if path.is_absolute() {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(
            std::path::absolute(path).map_err(|_| SecurityError::InvalidPath {
                path: path.to_path_buf(),
                reason: "path cannot be made absolute",
            })?,
        )
    };
    Ok(clean_path(&absolute))
}
