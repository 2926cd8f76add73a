//! Archive sources for the upstream tree.
//!
//! The pipeline only needs "give me the entries of this version"; where the
//! bytes come from is behind the [`ArchiveSource`] trait so builds can run
//! from a local tarball as well as from the network.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AmalgamateError, AmalgamateResult};
use crate::source::{decode_archive, SourceEntry};

/// Something that can produce the decoded entries of an upstream release.
pub trait ArchiveSource {
    /// Short description for log output (URL or file path).
    fn describe(&self) -> String;

    /// Retrieve and decode the archive.
    fn fetch(&self) -> AmalgamateResult<Vec<SourceEntry>>;
}

/// Downloads a release tarball over HTTP.
///
/// One GET, no retries. The whole request is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    url: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn network_error(&self, e: impl std::fmt::Display) -> AmalgamateError {
        AmalgamateError::Network {
            url: self.url.clone(),
            reason: e.to_string(),
        }
    }
}

impl ArchiveSource for HttpFetcher {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> AmalgamateResult<Vec<SourceEntry>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.network_error(e))?;

        tracing::debug!(url = %self.url, timeout = ?self.timeout, "downloading archive");

        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AmalgamateError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        // Timeouts while streaming the body surface as read errors; report
        // them as network failures rather than a corrupt archive.
        let bytes = response.bytes().map_err(|e| self.network_error(e))?;
        tracing::debug!(
            bytes = %humansize::format_size(bytes.len(), humansize::DECIMAL),
            "archive downloaded"
        );

        decode_archive(bytes.as_ref())
    }
}

/// Reads a release tarball from disk.
#[derive(Debug, Clone)]
pub struct LocalArchive {
    path: PathBuf,
}

impl LocalArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveSource for LocalArchive {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> AmalgamateResult<Vec<SourceEntry>> {
        let file = File::open(&self.path).map_err(|e| {
            AmalgamateError::archive(format!("failed to open {}: {}", self.path.display(), e))
        })?;
        decode_archive(BufReader::new(file))
    }
}
