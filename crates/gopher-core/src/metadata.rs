//! Installation metadata sidecar.
//!
//! Each installed version carries a plain-text `.gopher-metadata` file with
//! one `key=value` pair per line.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;

use crate::InstallError;
use crate::Result;
use crate::platform::TargetPlatform;
use crate::security::validate_path_within_root;

/// File name of the metadata sidecar inside an installation directory.
pub const METADATA_FILE: &str = ".gopher-metadata";

/// Metadata recorded for one installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallMetadata {
    /// Installed version.
    pub version: String,
    /// Target operating system.
    pub os: String,
    /// Target architecture.
    pub arch: String,
    /// When the installation was written.
    pub installed_at: DateTime<Utc>,
    /// Final installation directory.
    pub install_dir: PathBuf,
}

impl InstallMetadata {
    /// Creates metadata stamped with the current time.
    #[must_use]
    pub fn new(version: &str, platform: &TargetPlatform, install_dir: &Path) -> Self {
        Self {
            version: version.to_string(),
            os: platform.os.as_goos().to_string(),
            arch: platform.arch.as_goarch().to_string(),
            installed_at: Utc::now(),
            install_dir: install_dir.to_path_buf(),
        }
    }

    /// Renders the sidecar content.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::TimeZone;
    /// use chrono::Utc;
    /// use gopher_core::metadata::InstallMetadata;
    /// use std::path::PathBuf;
    ///
    /// let metadata = InstallMetadata {
    ///     version: "1.22.1".into(),
    ///     os: "linux".into(),
    ///     arch: "amd64".into(),
    ///     installed_at: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
    ///     install_dir: PathBuf::from("/opt/gopher/1.22.1"),
    /// };
    /// assert_eq!(
    ///     metadata.to_sidecar(),
    ///     "version=1.22.1\nos=linux\narch=amd64\ninstalled_at=2024-03-05T12:00:00Z\n\
    ///      install_dir=/opt/gopher/1.22.1\n"
    /// );
    /// ```
    #[must_use]
    pub fn to_sidecar(&self) -> String {
        format!(
            "version={}\nos={}\narch={}\ninstalled_at={}\ninstall_dir={}\n",
            self.version,
            self.os,
            self.arch,
            self.installed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.install_dir.display()
        )
    }

    /// Writes the sidecar into `dir` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar path fails the containment check or
    /// the file cannot be written.
    pub fn write_into(&self, dir: &Path) -> Result<PathBuf> {
        let path = validate_path_within_root(&dir.join(METADATA_FILE), dir)?.into_path_buf();
        fs::write(&path, self.to_sidecar()).map_err(|e| InstallError::io("write", &path, e))?;
        Ok(path)
    }
}

/// Parses sidecar content into key/value pairs.
///
/// Each line is split at its first `=`. Lines without `=` are ignored, as
/// are keys that are empty after trimming. Later duplicates win.
///
/// # Examples
///
/// ```
/// use gopher_core::metadata::parse;
///
/// let pairs = parse("version=1.22.1\nos=linux\n\njunk\nnote=a=b\n");
/// assert_eq!(pairs["version"], "1.22.1");
/// assert_eq!(pairs["note"], "a=b");
/// assert_eq!(pairs.len(), 3);
/// ```
#[must_use]
pub fn parse(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Reads and parses the sidecar in `dir`.
///
/// # Errors
///
/// Returns an error if the sidecar path fails the containment check, the
/// file cannot be read, or it is not valid UTF-8.
pub fn read_from(dir: &Path) -> Result<BTreeMap<String, String>> {
    let path = validate_path_within_root(&dir.join(METADATA_FILE), dir)?.into_path_buf();
    let bytes = fs::read(&path).map_err(|e| InstallError::io("read", &path, e))?;
    let text = String::from_utf8(bytes).map_err(|_| InstallError::InvalidMetadata {
        path: path.clone(),
        reason: "not valid UTF-8".to_string(),
    })?;
    Ok(parse(&text))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::platform::Arch;
    use crate::platform::Os;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_back() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let platform = TargetPlatform::new(Os::Darwin, Arch::Arm64);
        let metadata = InstallMetadata::new("1.21.0", &platform, Path::new("/opt/go/1.21.0"));

        let path = metadata.write_into(temp.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), METADATA_FILE);

        let pairs = read_from(temp.path()).unwrap();
        assert_eq!(pairs["version"], "1.21.0");
        assert_eq!(pairs["os"], "darwin");
        assert_eq!(pairs["arch"], "arm64");
        assert_eq!(pairs["install_dir"], "/opt/go/1.21.0");
        assert!(DateTime::parse_from_rfc3339(&pairs["installed_at"]).is_ok());
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let pairs = parse("no separator\n=empty key\n  spaced  =  value  \n");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs["spaced"], "value");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_read_missing_sidecar() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let err = read_from(temp.path()).unwrap_err();
        assert!(matches!(err, InstallError::IoContext { .. }));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join(METADATA_FILE), [0xFF, 0xFE, b'=']).unwrap();
        let err = read_from(temp.path()).unwrap_err();
        assert!(matches!(err, InstallError::InvalidMetadata { .. }));
    }
}
