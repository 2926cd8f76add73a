//! Configuration for an amalgamation run.
//!
//! Values come from built-in defaults, an optional TOML file and finally
//! command-line overrides. The resolved `Config` is fixed for one run.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AmalgamateError, AmalgamateResult};
use crate::features;

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "amalgamate.toml";

/// Default upstream version.
pub const DEFAULT_VERSION: &str = "0.21.6";

/// Placeholder replaced by the version in `url_template`.
const VERSION_PLACEHOLDER: &str = "{version}";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
    pub fetch: FetchConfig,
}

/// Where the upstream tree comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Project name; determines the archive prefix and macro names
    pub project: String,
    /// Upstream release tag
    pub version: String,
    /// Download URL, `{version}` is substituted
    pub url_template: String,
    /// Project home, quoted in the provenance preamble
    pub homepage: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            project: "sqlean".to_string(),
            version: DEFAULT_VERSION.to_string(),
            url_template: "https://github.com/nalgeon/sqlean/archive/refs/tags/{version}.tar.gz"
                .to_string(),
            homepage: "https://github.com/nalgeon/sqlean".to_string(),
        }
    }
}

/// Which archive entries make it into the amalgamation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Inclusion globs; `*` never matches a path separator
    pub include: Vec<String>,
    /// Path prefixes dropped regardless of `include`
    pub skip: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include: vec!["src/*/*.c".to_string(), "src/*/*.h".to_string()],
            skip: features::default_skip_prefixes(),
        }
    }
}

/// Names of the emitted files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub header: String,
    pub source: String,
    /// Directory the writer places both files in
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            header: "sqlean.h".to_string(),
            source: "sqlean.c".to_string(),
            dir: PathBuf::from("."),
        }
    }
}

/// Network settings for the fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `./amalgamate.toml` and then
    /// the user config file are tried; if neither exists the defaults apply.
    pub fn load(explicit: Option<&Path>) -> AmalgamateResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from(&local);
        }

        if let Some(user) = Self::user_config_path() {
            if user.exists() {
                return Self::load_from(&user);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse a TOML config file.
    pub fn load_from(path: &Path) -> AmalgamateResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| AmalgamateError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::parse(&content).map_err(|reason| AmalgamateError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse config from TOML text.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Path of the per-user config file.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sqlean-amalgamator").join("config.toml"))
    }

    /// Download URL for the configured version.
    pub fn archive_url(&self) -> String {
        self.source
            .url_template
            .replace(VERSION_PLACEHOLDER, &self.source.version)
    }

    /// Synthetic top-level directory of the upstream archive.
    pub fn archive_prefix(&self) -> String {
        format!("{}-{}/", self.source.project, self.source.version)
    }

    /// Check values that would otherwise produce a broken amalgamation.
    pub fn validate(&self) -> Result<(), String> {
        if self.source.project.trim().is_empty() {
            return Err("source.project cannot be empty".to_string());
        }
        if self.source.version.trim().is_empty() {
            return Err("source.version cannot be empty".to_string());
        }
        for (key, name) in [
            ("output.header", &self.output.header),
            ("output.source", &self.output.source),
        ] {
            if name.is_empty() {
                return Err(format!("{} cannot be empty", key));
            }
            if name.contains('/') || name.contains('\\') {
                return Err(format!("{} must be a file name, got '{}'", key, name));
            }
        }
        if self.output.header == self.output.source {
            return Err("output.header and output.source must differ".to_string());
        }
        Ok(())
    }
}
