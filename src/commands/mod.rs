//! Subcommand handlers for the amalgamate binary.

pub mod build;
pub mod completions;
pub mod config;
pub mod features;
