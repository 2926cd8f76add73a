//! End-to-end amalgamation: fetch, normalize, filter, group, transform, emit.
//!
//! Each stage consumes the previous stage's output and produces a fresh
//! value. Any error aborts the run; there is no partial output.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};

use crate::config::Config;
use crate::emit::{Amalgamation, Emitter};
use crate::error::{AmalgamateError, AmalgamateResult};
use crate::features;
use crate::fetch::ArchiveSource;
use crate::group::{group_entries, Grouped};
use crate::paths::{strip_archive_prefix, PathFilter};
use crate::source::SourceEntry;
use crate::transform::{StripLocalIncludes, Transform};

/// Current local time in RFC 3339 with second precision.
pub fn generation_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a user supplied RFC 3339 timestamp and re-render it canonically.
pub fn parse_timestamp(value: &str) -> Result<String, chrono::ParseError> {
    let parsed: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(value)?;
    Ok(parsed.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Runs the whole pipeline for one configuration.
pub struct Amalgamator {
    config: Config,
    source: Box<dyn ArchiveSource>,
    timestamp: String,
}

impl Amalgamator {
    pub fn new(config: Config, source: Box<dyn ArchiveSource>) -> Self {
        Self {
            config,
            source,
            timestamp: generation_timestamp(),
        }
    }

    /// Pin the generation timestamp for reproducible output.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the archive and amalgamate it.
    pub fn run(&self) -> AmalgamateResult<Amalgamation> {
        // Compile patterns first so a bad config fails before any download.
        let filter = PathFilter::new(&self.config.filter)?;

        tracing::info!(
            version = %self.config.source.version,
            from = %self.source.describe(),
            "fetching sources"
        );
        let entries = self.source.fetch()?;
        tracing::info!(entries = entries.len(), "archive decoded");

        amalgamate_with(entries, &self.config, &filter, &self.timestamp)
    }
}

/// Amalgamate already fetched entries.
pub fn amalgamate(
    entries: Vec<SourceEntry>,
    config: &Config,
    timestamp: &str,
) -> AmalgamateResult<Amalgamation> {
    let filter = PathFilter::new(&config.filter)?;
    amalgamate_with(entries, config, &filter, timestamp)
}

fn amalgamate_with(
    entries: Vec<SourceEntry>,
    config: &Config,
    filter: &PathFilter,
    timestamp: &str,
) -> AmalgamateResult<Amalgamation> {
    let normalized = strip_archive_prefix(entries, &config.archive_prefix());

    let kept = filter.apply(normalized);
    let kept_count = kept.len();
    tracing::info!(entries = kept_count, "entries after filtering");

    let grouped = group_entries(kept);
    ensure_all_grouped(kept_count, &grouped)?;
    features::ensure_unique_guards(&config.source.project, grouped.features())?;
    tracing::debug!(
        headers = grouped.headers.len(),
        sources = grouped.sources.len(),
        features = grouped.features().len(),
        "entries grouped"
    );
    check_registry(&grouped);

    let transformed = strip_includes(&grouped);

    let output = Emitter::new(config, timestamp).emit(&transformed);
    tracing::info!(
        header = %humansize::format_size(output.header.len(), humansize::DECIMAL),
        source = %humansize::format_size(output.source.len(), humansize::DECIMAL),
        features = output.features.len(),
        "amalgamation emitted"
    );

    Ok(output)
}

/// Every filtered entry must land in exactly one bucket.
fn ensure_all_grouped(kept: usize, grouped: &Grouped) -> AmalgamateResult<()> {
    let grouped_count = grouped.len();
    if grouped_count != kept {
        return Err(AmalgamateError::Group {
            reason: format!(
                "{} entries passed the filter but {} were grouped",
                kept, grouped_count
            ),
        });
    }
    Ok(())
}

fn strip_includes(grouped: &Grouped) -> Grouped {
    let transform = StripLocalIncludes::new();
    let apply = |entry: &SourceEntry| entry.with_content(transform.apply(&entry.content));
    Grouped {
        headers: grouped.headers.map_entries(apply),
        sources: grouped.sources.map_entries(apply),
    }
}

/// Report disagreement between the archive and the feature registry.
fn check_registry(grouped: &Grouped) {
    let present = grouped.features();

    for name in &present {
        if features::find(name).is_none() {
            tracing::warn!(feature = %name, "feature not in registry, emitting anyway");
        }
    }

    for feature in features::FEATURES.iter().filter(|f| f.included) {
        if !present.contains(&feature.name) {
            tracing::warn!(feature = feature.name, "registered feature missing from archive");
        }
    }
}
