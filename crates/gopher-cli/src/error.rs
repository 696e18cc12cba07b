//! Error conversion utilities for CLI.
//!
//! Converts gopher-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use gopher_core::InstallError;
use gopher_core::SecurityError;

/// Converts `InstallError` to user-friendly anyhow error with a hint
pub fn convert_install_error(err: InstallError) -> anyhow::Error {
    let hint = match err.root_cause() {
        InstallError::Security(SecurityError::PathTraversal { .. }) => Some(
            "This archive may be malicious. Do not install from untrusted sources.",
        ),
        InstallError::Security(_) => {
            Some("Version names and paths may not contain shell metacharacters or '..'.")
        }
        InstallError::QuotaExceeded { .. } => Some(
            "Use --max-file-size, --max-total-size, or --max-files to increase limits.",
        ),
        InstallError::UnsupportedEntry { .. } => Some(
            "Toolchain archives contain only files and directories; this archive may have been tampered with.",
        ),
        InstallError::UnsupportedFormat { .. } => Some("Supported formats: tar.gz, tgz, zip"),
        InstallError::NotImplemented { .. } => {
            Some("Run the installer package with the operating system's own installer.")
        }
        InstallError::MissingPrefix { .. } => {
            Some("Use --prefix to name the archive's top-level directory (\"\" for none).")
        }
        InstallError::MissingBinary { .. } => {
            Some("Check that --os and --arch match the platform the archive was built for.")
        }
        InstallError::NotInstalled { .. } => Some("Run `gopher list` to see installed versions."),
        InstallError::BinaryNotFound { .. } => {
            Some("The installation is incomplete; reinstall this version.")
        }
        InstallError::InvalidArchive(_) => {
            Some("The archive may be corrupted or truncated; download it again.")
        }
        _ => None,
    };

    let prefix = if err.is_security_violation() {
        "Security violation: "
    } else {
        ""
    };

    match hint {
        Some(hint) => anyhow!("{prefix}{err}\nHINT: {hint}"),
        None => anyhow::Error::from(err),
    }
}

/// Converts the error of a core operation
pub fn add_install_context<T>(result: Result<T, InstallError>) -> anyhow::Result<T> {
    result.map_err(convert_install_error)
}
