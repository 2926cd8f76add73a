//! amalgamate - build a single-file sqlean amalgamation

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use amalgamator::cli::{Cli, Commands, ConfigCommands};
use amalgamator::Config;

/// Log to stderr; `RUST_LOG` wins over `-v` flags.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("amalgamator={0},amalgamate={0}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Build(args) => commands::build::handle(config_path, &args),
        Commands::Features { json } => {
            let config = Config::load(config_path)?;
            commands::features::handle(&config, json)
        }
        Commands::Config(ConfigCommands::Show) => commands::config::handle_show(config_path),
        Commands::Completions { shell } => {
            commands::completions::handle(shell);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
