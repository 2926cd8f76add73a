//! Persisting an amalgamation to disk.
//!
//! Both files are first written to temporary files in the target directory
//! and only renamed into place once both writes succeeded, so a failed run
//! never leaves a truncated header or source behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::emit::Amalgamation;
use crate::error::{AmalgamateError, AmalgamateResult};

/// Paths of the files produced by [`write_amalgamation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub header: PathBuf,
    pub source: PathBuf,
}

/// Write `amalgamation` as `dir/header_name` and `dir/source_name`.
///
/// Existing files are replaced. `dir` is created if missing.
pub fn write_amalgamation(
    dir: &Path,
    header_name: &str,
    source_name: &str,
    amalgamation: &Amalgamation,
) -> AmalgamateResult<WrittenFiles> {
    fs::create_dir_all(dir).map_err(|source| AmalgamateError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let header_path = dir.join(header_name);
    let source_path = dir.join(source_name);

    let header_tmp = stage(dir, &header_path, &amalgamation.header)?;
    let source_tmp = stage(dir, &source_path, &amalgamation.source)?;

    persist(header_tmp, &header_path)?;
    persist(source_tmp, &source_path)?;

    tracing::debug!(
        header = %header_path.display(),
        source = %source_path.display(),
        "amalgamation written"
    );

    Ok(WrittenFiles {
        header: header_path,
        source: source_path,
    })
}

fn stage(dir: &Path, target: &Path, bytes: &[u8]) -> AmalgamateResult<NamedTempFile> {
    let write_err = |source| AmalgamateError::Write {
        path: target.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    Ok(tmp)
}

fn persist(tmp: NamedTempFile, target: &Path) -> AmalgamateResult<()> {
    tmp.persist(target).map_err(|e| AmalgamateError::Write {
        path: target.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
