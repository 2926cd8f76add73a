//! Snapshot tests for the emitted header and source layout

use amalgamator::source::decode_archive;
use amalgamator::{amalgamate, Config};

use crate::helpers::{release_tarball, sample_files, TIMESTAMP, VERSION};

fn sample_amalgamation() -> (String, String) {
    let mut config = Config::default();
    config.source.version = VERSION.to_string();

    let entries = decode_archive(release_tarball(&sample_files()).as_slice()).unwrap();
    let output = amalgamate(entries, &config, TIMESTAMP).unwrap();

    (
        String::from_utf8(output.header).unwrap(),
        String::from_utf8(output.source).unwrap(),
    )
}

#[test]
fn header_layout() {
    let (header, _) = sample_amalgamation();
    insta::assert_snapshot!("header_layout", header);
}

#[test]
fn source_layout() {
    let (_, source) = sample_amalgamation();
    insta::assert_snapshot!("source_layout", source);
}
