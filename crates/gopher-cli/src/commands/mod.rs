//! Subcommand implementations.

pub mod completion;
pub mod info;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod which;

use crate::cli::Cli;
use crate::error::add_install_context;
use anyhow::Result;
use gopher_core::InstallConfig;
use gopher_core::Installer;

/// Opens the installer for the root and platform selected on the command
/// line.
fn open_installer(cli: &Cli, config: InstallConfig) -> Result<Installer> {
    let root = cli.root_dir()?;
    add_install_context(Installer::new(root, config))
}

/// Opens the installer with default limits.
fn default_installer(cli: &Cli) -> Result<Installer> {
    open_installer(cli, InstallConfig::default().with_platform(cli.platform()))
}
