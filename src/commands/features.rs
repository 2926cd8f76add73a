//! Features subcommand handler

use anyhow::Result;
use serde::Serialize;

use amalgamator::features::{Feature, FEATURES};
use amalgamator::Config;

/// One row of the feature listing.
#[derive(Debug, Serialize)]
struct FeatureRow<'a> {
    name: &'a str,
    included: bool,
    guard: String,
    init_symbol: String,
    omit_tag: String,
}

impl<'a> FeatureRow<'a> {
    fn new(feature: &'a Feature, config: &Config) -> Self {
        let project = &config.source.project;
        // A feature is effectively excluded when the active skip list covers it.
        let prefix = feature.source_prefix();
        let included = !config
            .filter
            .skip
            .iter()
            .any(|skip| prefix.starts_with(skip.as_str()));
        Self {
            name: feature.name,
            included,
            guard: feature.guard_macro(project),
            init_symbol: feature.init_symbol(),
            omit_tag: feature.omit_tag(project),
        }
    }
}

/// List registered features as a table or JSON.
pub fn handle(config: &Config, json: bool) -> Result<()> {
    let rows: Vec<FeatureRow> = FEATURES.iter().map(|f| FeatureRow::new(f, config)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(7);
    let guard_width = rows.iter().map(|r| r.guard.len()).max().unwrap_or(0);

    println!(
        "{:<nw$}  {:<8}  {:<gw$}  {}",
        "FEATURE",
        "STATUS",
        "GUARD",
        "INIT",
        nw = name_width,
        gw = guard_width
    );
    for row in &rows {
        let status = if row.included { "included" } else { "skipped" };
        println!(
            "{:<nw$}  {:<8}  {:<gw$}  {}",
            row.name,
            status,
            row.guard,
            row.init_symbol,
            nw = name_width,
            gw = guard_width
        );
    }

    Ok(())
}
