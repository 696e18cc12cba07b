//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::VersionInfo;
use anyhow::Result;
use gopher_core::InstallReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_install_result(&self, report: &InstallReport) -> Result<()> {
        #[derive(Serialize)]
        struct InstallOutput<'a> {
            version: &'a str,
            install_dir: &'a Path,
            metadata_path: &'a Path,
            replaced: bool,
            files_extracted: usize,
            directories_created: usize,
            bytes_written: u64,
            duration_ms: u128,
        }

        let data = InstallOutput {
            version: &report.version,
            install_dir: &report.install_dir,
            metadata_path: &report.metadata_path,
            replaced: report.replaced,
            files_extracted: report.extraction.files_extracted,
            directories_created: report.extraction.directories_created,
            bytes_written: report.extraction.bytes_written,
            duration_ms: report.extraction.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("install", data))
    }

    fn format_uninstall_result(&self, version: &str) -> Result<()> {
        #[derive(Serialize)]
        struct UninstallOutput<'a> {
            version: &'a str,
        }

        Self::output(&JsonOutput::success("uninstall", UninstallOutput { version }))
    }

    fn format_versions(&self, versions: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            versions: &'a [String],
        }

        Self::output(&JsonOutput::success("list", ListOutput { versions }))
    }

    fn format_version_info(&self, info: &VersionInfo) -> Result<()> {
        Self::output(&JsonOutput::success("info", info))
    }

    fn format_binary_path(&self, version: &str, path: &Path) -> Result<()> {
        #[derive(Serialize)]
        struct WhichOutput<'a> {
            version: &'a str,
            path: &'a Path,
        }

        Self::output(&JsonOutput::success("which", WhichOutput { version, path }))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningOutput<'a> {
            level: &'static str,
            message: &'a str,
        }

        let warning = WarningOutput {
            level: "warning",
            message,
        };
        if let Ok(json) = serde_json::to_string(&warning) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let output = JsonOutput::success("list", vec!["1.22.1"]);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["operation"], "list");
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"][0], "1.22.1");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let output = JsonOutput::error("install", "boom");
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }
}
