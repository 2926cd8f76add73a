//! Source entries and archive decoding.

use std::io::Read;

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};

use crate::error::{AmalgamateError, AmalgamateResult};

/// A regular file read from the upstream archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Slash-separated path inside the archive
    pub path: String,
    /// Raw file content
    pub content: Vec<u8>,
}

impl SourceEntry {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Feature directory of an entry under `src/`.
    ///
    /// `src/math/math.c` belongs to `math`; paths outside `src/` or directly
    /// inside it have no feature.
    pub fn feature(&self) -> Option<&str> {
        let mut parts = self.path.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("src"), Some(feature), Some(_)) if !feature.is_empty() => Some(feature),
            _ => None,
        }
    }

    pub fn is_header(&self) -> bool {
        self.path.ends_with(".h")
    }

    pub fn is_source(&self) -> bool {
        self.path.ends_with(".c")
    }

    /// Same entry with different content.
    pub fn with_content(&self, content: Vec<u8>) -> Self {
        Self {
            path: self.path.clone(),
            content,
        }
    }
}

/// Upper bound on the buffer reserved up front for one entry.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Decode a gzip-compressed tar stream into its regular files, in archive order.
///
/// Directories, links and metadata entries are skipped.
pub fn decode_archive<R: Read>(reader: R) -> AmalgamateResult<Vec<SourceEntry>> {
    let mut archive = Archive::new(GzDecoder::new(reader));
    let entries = archive
        .entries()
        .map_err(|e| AmalgamateError::archive(format!("failed to open tar stream: {}", e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let mut entry = entry
            .map_err(|e| AmalgamateError::archive(format!("failed to read tar entry: {}", e)))?;

        if entry.header().entry_type() != EntryType::Regular {
            continue;
        }

        let path = entry
            .path()
            .map_err(|e| AmalgamateError::archive(format!("invalid entry path: {}", e)))?
            .to_string_lossy()
            .replace('\\', "/");

        // The declared size comes from the archive; never trust it for allocation.
        let declared = entry.size();
        let mut content = Vec::with_capacity(declared.min(MAX_PREALLOCATION) as usize);
        entry
            .read_to_end(&mut content)
            .map_err(|e| AmalgamateError::ArchiveEntry {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        if content.len() as u64 != declared {
            return Err(AmalgamateError::ArchiveEntry {
                path,
                reason: format!(
                    "truncated: header declares {} bytes, read {}",
                    declared,
                    content.len()
                ),
            });
        }

        tracing::trace!(path = %path, bytes = content.len(), "read archive entry");
        files.push(SourceEntry { path, content });
    }

    Ok(files)
}
