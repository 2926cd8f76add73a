//! Build subcommand handler

use std::path::Path;

use anyhow::{Context, Result};

use amalgamator::cli::BuildArgs;
use amalgamator::fetch::{ArchiveSource, HttpFetcher, LocalArchive};
use amalgamator::output::write_amalgamation;
use amalgamator::pipeline::{parse_timestamp, Amalgamator};
use amalgamator::Config;

/// Fetch, amalgamate and write both files.
#[cfg(not(tarpaulin_include))]
pub fn handle(config_path: Option<&Path>, args: &BuildArgs) -> Result<()> {
    let mut config = Config::load(config_path)?;
    args.apply_to(&mut config);
    config
        .validate()
        .map_err(|reason| anyhow::anyhow!("invalid configuration: {}", reason))?;

    let source: Box<dyn ArchiveSource> = match &args.archive {
        Some(path) => Box::new(LocalArchive::new(path)),
        None => Box::new(HttpFetcher::new(
            config.archive_url(),
            config.fetch.timeout(),
        )),
    };

    let mut amalgamator = Amalgamator::new(config.clone(), source);
    if let Some(ts) = &args.timestamp {
        let ts = parse_timestamp(ts).with_context(|| format!("invalid --timestamp '{}'", ts))?;
        amalgamator = amalgamator.with_timestamp(ts);
    }

    let amalgamation = amalgamator
        .run()
        .with_context(|| format!("failed to amalgamate version {}", config.source.version))?;

    let written = write_amalgamation(
        &config.output.dir,
        &config.output.header,
        &config.output.source,
        &amalgamation,
    )?;

    println!(
        "Wrote {} ({})",
        written.header.display(),
        humansize::format_size(amalgamation.header.len(), humansize::DECIMAL)
    );
    println!(
        "Wrote {} ({})",
        written.source.display(),
        humansize::format_size(amalgamation.source.len(), humansize::DECIMAL)
    );
    println!(
        "{} files from {} features: {}",
        amalgamation.files,
        amalgamation.features.len(),
        amalgamation.features.join(", ")
    );

    Ok(())
}
