//! Command-line interface definitions.
//!
//! Lives in the library so the man page generator in `xtask` can reuse it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::Config;

/// Version string including the git commit for development builds.
#[cfg(not(feature = "release"))]
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "-",
    env!("VERGEN_GIT_SHA"),
    " (built ",
    env!("AMALGAMATE_BUILD_DATE"),
    ")"
);

/// Version string for release builds.
#[cfg(feature = "release")]
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("AMALGAMATE_BUILD_DATE"),
    ")"
);

#[derive(Debug, Parser)]
#[command(
    name = "amalgamate",
    version,
    long_version = LONG_VERSION,
    about = "Amalgamate the sqlean C sources into one header and one source file",
    long_about = "Downloads a tagged sqlean release, keeps the src/<feature>/<file>.{c,h} \
                  files outside the skip list, strips local includes and writes a single \
                  header and source file with one SQLEAN_ENABLE_<FEATURE> guard per feature."
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./amalgamate.toml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch a release and write the amalgamated header and source
    Build(BuildArgs),

    /// List known features with their guard macros and init symbols
    Features {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Print a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
}

/// Overrides for a single build. Unset values come from the config file.
#[derive(Debug, Default, Args)]
pub struct BuildArgs {
    /// Upstream release tag to amalgamate
    #[arg(id = "release", value_name = "VERSION")]
    pub version: Option<String>,

    /// Header file name
    #[arg(long, value_name = "NAME")]
    pub header: Option<String>,

    /// Source file name
    #[arg(long, value_name = "NAME")]
    pub source: Option<String>,

    /// Directory to write both files into
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Path prefix to leave out (repeatable, replaces the configured list)
    #[arg(long = "skip", value_name = "PREFIX")]
    pub skip: Vec<String>,

    /// Read the release tarball from disk instead of downloading it
    #[arg(long, value_name = "PATH")]
    pub archive: Option<PathBuf>,

    /// Download timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Fixed RFC 3339 generation timestamp for reproducible output
    #[arg(long, value_name = "RFC3339")]
    pub timestamp: Option<String>,
}

impl BuildArgs {
    /// Apply the command-line overrides on top of a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(version) = &self.version {
            config.source.version = version.clone();
        }
        if let Some(header) = &self.header {
            config.output.header = header.clone();
        }
        if let Some(source) = &self.source {
            config.output.source = source.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.output.dir = dir.clone();
        }
        if !self.skip.is_empty() {
            config.filter.skip = self.skip.clone();
        }
        if let Some(timeout) = self.timeout {
            config.fetch.timeout_secs = timeout;
        }
    }
}
