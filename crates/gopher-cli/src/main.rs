//! Gopher CLI - Command-line utility for installing Go toolchains from
//! downloaded archives.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::output::OutputFormatter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(cli.command.name(), &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    match &cli.command {
        Commands::Install(args) => commands::install::execute(cli, args, formatter),
        Commands::Uninstall(args) => commands::uninstall::execute(cli, args, formatter),
        Commands::List => commands::list::execute(cli, formatter),
        Commands::Info(args) => commands::info::execute(cli, args, formatter),
        Commands::Which(args) => commands::which::execute(cli, args, formatter),
        Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` overrides the
/// level picked from the flags.
fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
