//! Shell completion generation command.

use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;
use std::io::Write;

/// Writes completions for `shell` to stdout.
pub fn execute(shell: Shell) {
    generate(shell, &mut io::stdout());
}

fn generate(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}
