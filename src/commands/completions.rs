//! Shell completion script generation.

use std::io;

use clap::CommandFactory;
use clap_complete::Shell;

use amalgamator::cli::Cli;

/// Write the completion script for `shell` to stdout.
pub fn handle(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}
