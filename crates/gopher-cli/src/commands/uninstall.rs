//! Uninstall command implementation

use super::default_installer;
use crate::cli::Cli;
use crate::cli::VersionArgs;
use crate::error::add_install_context;
use crate::output::OutputFormatter;
use anyhow::Result;

pub fn execute(cli: &Cli, args: &VersionArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let installer = default_installer(cli)?;
    add_install_context(installer.uninstall(&args.version))?;
    formatter.format_uninstall_result(&args.version)
}
