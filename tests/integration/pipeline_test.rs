//! End-to-end pipeline tests over fixture archives.

use amalgamator::config::Config;
use amalgamator::fetch::LocalArchive;
use amalgamator::group::group_entries;
use amalgamator::paths::{strip_archive_prefix, PathFilter};
use amalgamator::source::decode_archive;
use amalgamator::{Amalgamation, Amalgamator};
use proptest::prelude::*;

use crate::helpers::{release_tarball, sample_files, temp_archive, TIMESTAMP, VERSION};

fn config() -> Config {
    let mut config = Config::default();
    config.source.version = VERSION.to_string();
    config
}

fn run(files: &[(&str, &str)], config: Config) -> Amalgamation {
    let (_dir, path) = temp_archive(files);
    Amalgamator::new(config, Box::new(LocalArchive::new(path)))
        .with_timestamp(TIMESTAMP)
        .run()
        .expect("amalgamation should succeed")
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn count_lines(haystack: &str, line: &str) -> usize {
    haystack.lines().filter(|l| *l == line).count()
}

// ============================================================================
// Example scenarios
// ============================================================================

#[test]
fn skip_listed_features_never_reach_output() {
    let files = vec![
        ("src/math/math.c", "int math_init(void* db) { return 0; }\n"),
        ("src/math/math.h", "int math_init(void* db);\n"),
        ("src/fuzzy/lev.c", "int lev(void) { return 0; }\n"),
        ("src/regexp/re.c", "int re(void) { return 0; }\n"),
    ];

    let output = run(&files, config());
    let header = text(&output.header);
    let source = text(&output.source);

    assert_eq!(count_lines(&header, "#ifdef SQLEAN_ENABLE_MATH"), 1);
    assert!(header.contains("int math_init(void* db);\n"));
    assert_eq!(count_lines(&source, "#ifdef SQLEAN_ENABLE_MATH"), 1);
    assert!(source.contains("int math_init(void* db) { return 0; }\n"));
    assert!(source.contains("sqlite3_result_text(context, SQLEAN_VERSION, -1, SQLITE_STATIC);"));

    for buffer in [&header, &source] {
        assert!(!buffer.contains("fuzzy"));
        assert!(!buffer.contains("FUZZY"));
        assert!(!buffer.contains("regexp"));
        assert!(!buffer.contains("REGEXP"));
    }
}

#[test]
fn local_include_removed_system_include_kept() {
    let files = vec![(
        "src/math/math.h",
        "#include \"helper.h\"\n#include <stdint.h>\nint f(void);\n",
    )];

    let header = text(&run(&files, config()).header);

    assert!(!header.contains("#include \"helper.h\""));
    assert!(header.contains("#include <stdint.h>\nint f(void);\n"));
}

#[test]
fn source_only_feature_gets_guards_in_both_buffers() {
    let files = vec![
        ("src/math/math.h", "int math_init(void* db);\n"),
        ("src/math/math.c", "int math_init(void* db) { return 0; }\n"),
        ("src/uuid/uuid.c", "int uuid_init(void* db) { return 0; }\n"),
    ];

    let output = run(&files, config());
    let header = text(&output.header);
    let source = text(&output.source);

    for buffer in [&header, &source] {
        assert_eq!(count_lines(buffer, "#ifdef SQLEAN_ENABLE_UUID"), 1);
        assert_eq!(count_lines(buffer, "#endif // SQLEAN_ENABLE_UUID"), 1);
        assert_eq!(count_lines(buffer, "#ifdef SQLEAN_ENABLE_MATH"), 1);
    }
    assert_eq!(output.features, vec!["math", "uuid"]);
}

#[test]
fn colliding_guard_names_abort_the_build() {
    let files = vec![
        ("src/foo-bar/a.c", "int a;\n"),
        ("src/foo_bar/b.c", "int b;\n"),
    ];
    let (_dir, path) = temp_archive(&files);

    let err = Amalgamator::new(config(), Box::new(LocalArchive::new(path)))
        .with_timestamp(TIMESTAMP)
        .run()
        .unwrap_err();

    assert_eq!(err.stage(), "group");
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn filtered_entries_all_reach_a_group() {
    let files = sample_files();
    let config = config();
    let filter = PathFilter::new(&config.filter).unwrap();

    let entries = decode_archive(release_tarball(&files).as_slice()).unwrap();
    let normalized = strip_archive_prefix(entries, &config.archive_prefix());

    let mut expected: Vec<String> = normalized
        .iter()
        .filter(|e| filter.accepts(&e.path))
        .map(|e| e.path.clone())
        .collect();
    expected.sort();

    let grouped = group_entries(filter.apply(normalized));
    let mut actual: Vec<String> = grouped
        .headers
        .iter()
        .chain(grouped.sources.iter())
        .flat_map(|(_, entries)| entries.iter().map(|e| e.path.clone()))
        .collect();
    actual.sort();

    assert_eq!(actual, expected);
    assert_eq!(
        actual,
        vec![
            "src/crypto/md5.c",
            "src/crypto/md5.h",
            "src/crypto/sha1.c",
            "src/math/math.c",
            "src/math/math.h",
        ]
    );
}

#[test]
fn every_kept_file_gets_exactly_one_banner() {
    let output = run(&sample_files(), config());
    let header = text(&output.header);
    let source = text(&output.source);

    for path in ["src/crypto/md5.h", "src/math/math.h"] {
        assert_eq!(count_lines(&header, &format!("// {}", path)), 1, "{}", path);
    }
    for path in ["src/crypto/md5.c", "src/crypto/sha1.c", "src/math/math.c"] {
        assert_eq!(count_lines(&source, &format!("// {}", path)), 1, "{}", path);
    }
    assert_eq!(output.files, 5);
    assert_eq!(output.features, vec!["crypto", "math"]);
}

#[test]
fn nested_and_top_level_files_are_excluded() {
    let output = run(&sample_files(), config());
    let source = text(&output.source);
    let header = text(&output.header);

    assert!(!source.contains("src/text/utf8/utf8.c"));
    assert!(!source.contains("SQLEAN_ENABLE_TEXT"));
    assert!(!header.contains("/* host header */"));
}

#[test]
fn guards_wrap_their_feature_content() {
    let output = run(&sample_files(), config());
    let source = text(&output.source);

    for (feature, needle) in [
        ("CRYPTO", "void sha1(void) {}"),
        ("MATH", "int math_init(sqlite3* db) { return SQLITE_OK; }"),
    ] {
        let open = format!("#ifdef SQLEAN_ENABLE_{}", feature);
        let close = format!("#endif // SQLEAN_ENABLE_{}", feature);
        assert_eq!(count_lines(&source, &open), 1);
        assert_eq!(count_lines(&source, &close), 1);

        let start = source.find(&open).unwrap();
        let end = source.find(&close).unwrap();
        let at = source.find(needle).unwrap();
        assert!(start < at && at < end, "{} content outside its guard", feature);
    }
}

#[test]
fn rebuilding_is_byte_identical() {
    let first = run(&sample_files(), config());
    let second = run(&sample_files(), config());
    assert_eq!(first.header, second.header);
    assert_eq!(first.source, second.source);
}

#[test]
fn archive_order_does_not_change_feature_order() {
    let mut reversed = sample_files();
    reversed.reverse();

    let forward = text(&run(&sample_files(), config()).source);
    let backward = text(&run(&reversed, config()).source);

    let pos = |s: &str, f: &str| s.find(&format!("#ifdef SQLEAN_ENABLE_{}", f)).unwrap();
    assert!(pos(&forward, "CRYPTO") < pos(&forward, "MATH"));
    assert!(pos(&backward, "CRYPTO") < pos(&backward, "MATH"));
}

#[test]
fn custom_skip_list_replaces_default() {
    let mut config = config();
    config.filter.skip = vec!["src/crypto".to_string()];

    let output = run(&sample_files(), config);
    let source = text(&output.source);

    assert!(!source.contains("SQLEAN_ENABLE_CRYPTO"));
    assert!(source.contains("#ifdef SQLEAN_ENABLE_FUZZY"));
    assert!(source.contains("#ifdef SQLEAN_ENABLE_REGEXP"));
}

#[test]
fn archive_for_other_version_yields_empty_amalgamation() {
    let mut config = config();
    config.source.version = "9.9.9".to_string();

    let output = run(&sample_files(), config);

    assert!(output.features.is_empty());
    assert!(!text(&output.header).contains("#ifdef SQLEAN_ENABLE_"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn skip_prefix_excludes_feature(skipped in prop::sample::select(vec!["crypto", "math"])) {
        let mut config = config();
        config.filter.skip = vec![format!("src/{}", skipped)];

        let output = run(&sample_files(), config);
        let guard = format!("SQLEAN_ENABLE_{}", skipped.to_uppercase());
        let banner = format!("// src/{}/", skipped);

        for buffer in [text(&output.header), text(&output.source)] {
            prop_assert!(!buffer.contains(&guard));
            prop_assert!(!buffer.contains(&banner));
        }
    }

    #[test]
    fn grouping_neither_loses_nor_duplicates(
        names in prop::collection::vec(
            (prop::sample::select(vec!["a", "b", "c"]), "[a-z]{1,6}", prop::bool::ANY),
            0..24,
        )
    ) {
        let paths: Vec<String> = names
            .iter()
            .map(|(feature, file, header)| {
                format!("src/{}/{}.{}", feature, file, if *header { "h" } else { "c" })
            })
            .collect();
        let entries = paths
            .iter()
            .map(|p| amalgamator::SourceEntry::new(p.clone(), p.clone()))
            .collect::<Vec<_>>();

        let grouped = group_entries(entries);

        let mut out: Vec<String> = grouped
            .headers
            .iter()
            .chain(grouped.sources.iter())
            .flat_map(|(_, es)| es.iter().map(|e| e.path.clone()))
            .collect();
        let mut input = paths.clone();
        out.sort();
        input.sort();
        prop_assert_eq!(out, input);
    }
}
