//! Config subcommands handler

use std::path::Path;

use anyhow::{Context, Result};

use amalgamator::Config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let toml_str = toml::to_string_pretty(&config).context("failed to serialize config")?;
    print!("{}", toml_str);
    Ok(())
}
