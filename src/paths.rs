//! Path normalization and filtering.
//!
//! Release tarballs wrap everything in a `<project>-<version>/` directory.
//! After that prefix is removed, only `src/<feature>/<file>.{c,h}` entries
//! outside the skip list go on to the grouper.

use glob::{MatchOptions, Pattern};

use crate::config::FilterConfig;
use crate::error::{AmalgamateError, AmalgamateResult};
use crate::source::SourceEntry;

/// `*` and `?` never cross a `/`, so `src/*/*.c` matches exactly two levels.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Remove the archive's top-level directory from every path.
///
/// Paths without the prefix are left as they are.
pub fn strip_archive_prefix(entries: Vec<SourceEntry>, prefix: &str) -> Vec<SourceEntry> {
    entries
        .into_iter()
        .map(|mut entry| {
            if let Some(stripped) = entry.path.strip_prefix(prefix) {
                entry.path = stripped.to_string();
            } else {
                tracing::trace!(path = %entry.path, prefix, "entry outside archive prefix");
            }
            entry
        })
        .collect()
}

/// Inclusion globs plus skip prefixes.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Vec<Pattern>,
    skip: Vec<String>,
}

impl PathFilter {
    /// Compile the configured patterns.
    ///
    /// A malformed glob is a configuration bug and fails the whole run.
    pub fn new(config: &FilterConfig) -> AmalgamateResult<Self> {
        let include = config
            .include
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| AmalgamateError::Filter {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<AmalgamateResult<Vec<_>>>()?;

        Ok(Self {
            include,
            skip: config.skip.clone(),
        })
    }

    /// Path matches at least one inclusion glob.
    pub fn is_included(&self, path: &str) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }

    /// Path starts with a skip prefix.
    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn accepts(&self, path: &str) -> bool {
        self.is_included(path) && !self.is_skipped(path)
    }

    /// Keep accepted entries, preserving their relative order.
    pub fn apply(&self, entries: Vec<SourceEntry>) -> Vec<SourceEntry> {
        entries
            .into_iter()
            .filter(|entry| {
                if !self.is_included(&entry.path) {
                    tracing::trace!(path = %entry.path, "not matched by include patterns");
                    return false;
                }
                if self.is_skipped(&entry.path) {
                    tracing::debug!(path = %entry.path, "skipped");
                    return false;
                }
                if entry.feature().is_none() || !(entry.is_header() || entry.is_source()) {
                    tracing::debug!(path = %entry.path, "not a feature header or source");
                    return false;
                }
                true
            })
            .collect()
    }
}
