//! Install command implementation.

use super::open_installer;
use crate::cli::Cli;
use crate::cli::InstallArgs;
use crate::error::add_install_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;

pub fn execute(cli: &Cli, args: &InstallArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let installer = open_installer(cli, args.config(cli.platform()))?;

    // Spinner only when a human is watching stderr
    let report = if !cli.quiet && !cli.json && CliProgress::should_show() {
        let mut progress = CliProgress::new();
        add_install_context(installer.install_with_progress(
            &args.version,
            &args.archive,
            &mut progress,
        ))?
    } else {
        add_install_context(installer.install(&args.version, &args.archive))?
    };

    if report.replaced {
        formatter.format_warning(&format!(
            "replaced the existing installation of {}",
            report.version
        ));
    }
    formatter.format_install_result(&report)
}
