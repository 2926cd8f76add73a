//! Amalgamation errors.
//!
//! Every variant names the pipeline stage that raised it so a failed run can
//! be reported with a single line.

use std::path::PathBuf;

/// Result alias for amalgamation operations.
pub type AmalgamateResult<T> = Result<T, AmalgamateError>;

/// Errors that can occur while fetching, filtering or writing an amalgamation.
#[derive(Debug, thiserror::Error)]
pub enum AmalgamateError {
    #[error("fetch: failed to download {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("fetch: {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("archive: {reason}")]
    Archive { reason: String },

    #[error("archive: failed to read entry {path}: {reason}")]
    ArchiveEntry { path: String, reason: String },

    #[error("group: {reason}")]
    Group { reason: String },

    #[error("filter: invalid pattern '{pattern}': {source}")]
    Filter {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("write: failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config: {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl AmalgamateError {
    /// Name of the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } => "fetch",
            Self::Archive { .. } | Self::ArchiveEntry { .. } => "archive",
            Self::Filter { .. } => "filter",
            Self::Group { .. } => "group",
            Self::Write { .. } => "write",
            Self::Config { .. } => "config",
        }
    }

    /// Whether this error came from the network boundary.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::HttpStatus { .. })
    }

    pub(crate) fn archive(reason: impl std::fmt::Display) -> Self {
        Self::Archive {
            reason: reason.to_string(),
        }
    }
}
