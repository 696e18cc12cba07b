//! Structural checks on an extracted toolchain tree.

use crate::ExtractionReport;
use crate::InstallConfig;
use crate::InstallError;
use crate::Result;

/// Facts about the archive layout recorded while entries are written.
///
/// Verification is a pure function of these flags, so it can be exercised
/// without an archive.
///
/// # Examples
///
/// ```
/// use gopher_core::InstallConfig;
/// use gopher_core::extraction::LayoutCheck;
///
/// let config = InstallConfig::default();
/// let layout = LayoutCheck {
///     saw_prefix: true,
///     saw_binary: true,
/// };
/// assert!(layout.verify(&config).is_ok());
/// assert!(LayoutCheck::default().verify(&config).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutCheck {
    /// At least one entry carried the wrapper prefix.
    pub saw_prefix: bool,

    /// The runnable binary was written as a regular file.
    pub saw_binary: bool,
}

impl LayoutCheck {
    /// Checks the recorded layout against `config`.
    ///
    /// # Errors
    ///
    /// - `InstallError::MissingPrefix` if no entry carried the wrapper prefix
    /// - `InstallError::MissingBinary` if the runnable binary was never seen
    pub fn verify(&self, config: &InstallConfig) -> Result<()> {
        if !self.saw_prefix {
            return Err(InstallError::MissingPrefix {
                prefix: config.wrapper_prefix.clone(),
            });
        }
        if !self.saw_binary {
            return Err(InstallError::MissingBinary {
                binary: config.platform.go_binary(),
            });
        }
        Ok(())
    }
}

/// Result of extracting one archive.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    /// Extraction statistics.
    pub report: ExtractionReport,

    /// Recorded layout facts, not yet verified.
    pub layout: LayoutCheck,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::platform::Arch;
    use crate::platform::Os;
    use crate::platform::TargetPlatform;
    use std::path::PathBuf;

    #[test]
    fn test_missing_prefix_reported_first() {
        let config = InstallConfig::default();
        let err = LayoutCheck::default().verify(&config).unwrap_err();
        assert!(matches!(err, InstallError::MissingPrefix { ref prefix } if prefix == "go"));
        assert!(err.to_string().contains("does not have required prefix"));
    }

    #[test]
    fn test_missing_binary() {
        let config = InstallConfig::default();
        let layout = LayoutCheck {
            saw_prefix: true,
            saw_binary: false,
        };
        let err = layout.verify(&config).unwrap_err();
        assert!(matches!(err, InstallError::MissingBinary { .. }));
        assert!(err.to_string().contains("missing runnable binary"));
    }

    #[test]
    fn test_missing_binary_names_platform_executable() {
        let platform = TargetPlatform::new(Os::Windows, Arch::Amd64);
        let config = InstallConfig::default().with_platform(platform);
        let layout = LayoutCheck {
            saw_prefix: true,
            saw_binary: false,
        };
        match layout.verify(&config) {
            Err(InstallError::MissingBinary { binary }) => {
                assert_eq!(binary, PathBuf::from("bin").join("go.exe"));
            }
            other => panic!("expected missing binary, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_prefix_in_error() {
        let config = InstallConfig::default().with_wrapper_prefix("golang");
        let err = LayoutCheck::default().verify(&config).unwrap_err();
        assert!(err.to_string().contains("\"golang\""));
    }

    #[test]
    fn test_complete_layout() {
        let layout = LayoutCheck {
            saw_prefix: true,
            saw_binary: true,
        };
        assert!(layout.verify(&InstallConfig::default()).is_ok());
    }
}
