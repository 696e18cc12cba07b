//! Info command implementation

use super::default_installer;
use crate::cli::Cli;
use crate::cli::VersionArgs;
use crate::error::add_install_context;
use crate::output::OutputFormatter;
use crate::output::VersionInfo;
use anyhow::Result;

pub fn execute(cli: &Cli, args: &VersionArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let installer = default_installer(cli)?;
    let version = args.version.as_str();

    // Fails with NotInstalled before anything else is looked at.
    let disk_usage = add_install_context(installer.disk_usage(version))?;

    let metadata = installer.version_metadata(version).unwrap_or_else(|err| {
        formatter.format_warning(&format!("metadata unavailable: {err}"));
        Default::default()
    });

    let info = VersionInfo {
        version: version.to_string(),
        install_dir: add_install_context(installer.version_dir(version))?,
        go_binary: installer.go_binary_path(version).ok(),
        disk_usage,
        metadata,
    };
    formatter.format_version_info(&info)
}
