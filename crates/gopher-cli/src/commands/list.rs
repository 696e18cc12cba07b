//! List command implementation

use super::default_installer;
use crate::cli::Cli;
use crate::error::add_install_context;
use crate::output::OutputFormatter;
use anyhow::Result;

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let installer = default_installer(cli)?;

    let mut versions = add_install_context(installer.list_installed())?;
    versions.sort();

    formatter.format_versions(&versions)
}
