//! sqlean amalgamator library
//!
//! Turns a tagged sqlean release tarball into one header and one source file
//! that compile as a single translation unit, with every feature behind its
//! own `SQLEAN_ENABLE_<FEATURE>` guard.
//!
//! The pipeline runs in this order:
//!
//! - [`fetch`] - download (or read) and decode the release tarball
//! - [`paths`] - strip the archive prefix and filter `src/<feature>/<file>`
//! - [`group`] - split headers from sources and bucket them by feature
//! - [`transform`] - drop local include lines
//! - [`emit`] - assemble the guarded header and source buffers
//!
//! [`pipeline::Amalgamator`] runs all stages; [`output`] persists the result.

pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod features;
pub mod fetch;
pub mod group;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod source;
pub mod transform;

pub use config::Config;
pub use emit::{Amalgamation, Emitter};
pub use error::{AmalgamateError, AmalgamateResult};
pub use fetch::{ArchiveSource, HttpFetcher, LocalArchive};
pub use pipeline::{amalgamate, Amalgamator};
pub use source::SourceEntry;
