//! Development tasks for the amalgamator workspace.
//!
//! `cargo run -p xtask -- man` writes `amalgamate.1` into `target/man/`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

use amalgamator::cli::Cli;

#[derive(Parser)]
#[command(name = "xtask")]
struct Xtask {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages for the amalgamate binary
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out_dir: PathBuf,
    },
}

fn generate_man(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let cmd = Cli::command();
    let mut pages = vec![(cmd.get_name().to_string(), cmd.clone())];
    for sub in cmd.get_subcommands() {
        pages.push((format!("{}-{}", cmd.get_name(), sub.get_name()), sub.clone()));
    }

    for (name, page) in pages {
        let path = out_dir.join(format!("{}.1", name));
        let mut buffer = Vec::new();
        clap_mangen::Man::new(page)
            .render(&mut buffer)
            .with_context(|| format!("failed to render man page for {}", name))?;
        fs::write(&path, buffer).with_context(|| format!("failed to write {}", path.display()))?;
        println!("wrote {}", path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    match Xtask::parse().command {
        Task::Man { out_dir } => generate_man(out_dir),
    }
}
