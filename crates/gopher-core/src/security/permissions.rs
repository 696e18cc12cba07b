//! Permission bit handling.
//!
//! Archive formats store modes in integers of different widths (tar headers
//! are parsed to `u32`, zip stores the Unix mode in the upper 16 bits of the
//! external attributes). Every mode goes through [`mask_mode`] before it is
//! narrowed into a native permission value, so setuid/setgid/sticky bits and
//! file-type bits never reach the filesystem.

/// Standard permission-bit range (`rwxrwxrwx`).
pub const PERMISSION_BITS: u32 = 0o777;

/// Mode applied to files whose entry carries no mode.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Mode applied to directories whose entry carries no mode.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Masks an archive mode to the standard permission-bit range.
///
/// # Examples
///
/// ```
/// use gopher_core::security::mask_mode;
///
/// assert_eq!(mask_mode(0o100755), 0o755);
/// assert_eq!(mask_mode(0o4755), 0o755);
/// assert_eq!(mask_mode(u32::MAX), 0o777);
/// ```
#[inline]
#[must_use]
pub const fn mask_mode(mode: u32) -> u32 {
    mode & PERMISSION_BITS
}

/// Mode for a file entry.
#[inline]
#[must_use]
pub fn file_mode(mode: Option<u32>) -> u32 {
    mask_mode(mode.unwrap_or(DEFAULT_FILE_MODE))
}

/// Mode for a directory entry.
///
/// The owner always keeps `rwx` so the installer can populate, replace, and
/// remove the tree it created.
#[inline]
#[must_use]
pub fn dir_mode(mode: Option<u32>) -> u32 {
    mask_mode(mode.unwrap_or(DEFAULT_DIR_MODE)) | 0o700
}

/// Applies `mode` to `path`.
///
/// A no-op on platforms without Unix permissions.
#[cfg(unix)]
pub(crate) fn apply_mode(path: &std::path::Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mask_mode(mode)))
}

/// Applies `mode` to `path`.
///
/// A no-op on platforms without Unix permissions.
#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
pub(crate) fn apply_mode(_path: &std::path::Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_strips_special_and_type_bits() {
        assert_eq!(mask_mode(0o4755), 0o755);
        assert_eq!(mask_mode(0o2755), 0o755);
        assert_eq!(mask_mode(0o1777), 0o777);
        assert_eq!(mask_mode(0o100644), 0o644);
        assert_eq!(mask_mode(0o040755), 0o755);
    }

    #[test]
    fn test_mask_handles_full_width_values() {
        // A negative i32 mode reinterpreted as u32 must not leak high bits.
        #[allow(clippy::cast_sign_loss)]
        let from_signed = -1_i32 as u32;
        assert_eq!(mask_mode(from_signed), 0o777);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(file_mode(None), 0o644);
        assert_eq!(dir_mode(None), 0o755);
        assert_eq!(file_mode(Some(0o100755)), 0o755);
    }

    #[test]
    fn test_dir_mode_keeps_owner_access() {
        assert_eq!(dir_mode(Some(0o555)), 0o755);
        assert_eq!(dir_mode(Some(0o000)), 0o700);
    }

    #[test]
    #[cfg(unix)]
    fn test_apply_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::NamedTempFile::new().expect("failed to create temp file");
        apply_mode(temp.path(), 0o4750).expect("failed to apply mode");
        let mode = std::fs::metadata(temp.path())
            .expect("failed to stat")
            .permissions()
            .mode();
        assert_eq!(mode & 0o7777, 0o750);
    }
}
