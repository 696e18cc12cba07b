//! Output formatter trait for CLI results.

use anyhow::Result;
use gopher_core::InstallReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

/// Details of one installed version, as shown by `gopher info`.
#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub version: String,
    pub install_dir: PathBuf,
    pub go_binary: Option<PathBuf>,
    pub disk_usage: u64,
    pub metadata: BTreeMap<String, String>,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format install result
    fn format_install_result(&self, report: &InstallReport) -> Result<()>;

    /// Format uninstall result
    fn format_uninstall_result(&self, version: &str) -> Result<()>;

    /// Format the installed versions
    fn format_versions(&self, versions: &[String]) -> Result<()>;

    /// Format details of one version
    fn format_version_info(&self, info: &VersionInfo) -> Result<()>;

    /// Format the go binary location
    fn format_binary_path(&self, version: &str, path: &Path) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
