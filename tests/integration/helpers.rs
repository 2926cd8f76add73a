//! Shared fixtures: in-memory release tarballs and temp directories.

use std::fs;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

/// Version used by every fixture archive.
pub const VERSION: &str = "1.2.3";

/// Fixed generation timestamp for reproducible output.
pub const TIMESTAMP: &str = "2024-01-02T03:04:05Z";

/// Build a gzip-compressed tarball. Every path is placed under
/// `sqlean-<VERSION>/` and parent directories get their own entries, like a
/// GitHub release archive.
pub fn release_tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let prefix = format!("sqlean-{}/", VERSION);
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let mut dirs: Vec<String> = vec![prefix.clone()];
    for (path, _) in files {
        let mut acc = prefix.clone();
        let parts: Vec<&str> = path.split('/').collect();
        for part in &parts[..parts.len() - 1] {
            acc.push_str(part);
            acc.push('/');
            if !dirs.contains(&acc) {
                dirs.push(acc.clone());
            }
        }
    }

    for dir in &dirs {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, dir, std::io::empty())
            .unwrap();
    }

    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{}{}", prefix, path), content.as_bytes())
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// A small sqlean-like tree: two kept features, two skip-listed ones, and
/// files the path filter must reject.
pub fn sample_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("README.md", "# sqlean\n"),
        ("Makefile", "all:\n"),
        (
            "src/math/math.h",
            "// math extension\n#include \"sqlite3ext.h\"\n#include <stdint.h>\nint math_init(sqlite3* db);\n",
        ),
        (
            "src/math/math.c",
            "#include \"math/math.h\"\n#include <math.h>\nint math_init(sqlite3* db) { return SQLITE_OK; }\n",
        ),
        ("src/crypto/md5.h", "void md5(void);\n"),
        ("src/crypto/md5.c", "#include \"crypto/md5.h\"\nvoid md5(void) {}\n"),
        ("src/crypto/sha1.c", "void sha1(void) {}\n"),
        ("src/fuzzy/lev.c", "int levenshtein(void) { return 0; }\n"),
        ("src/regexp/re.c", "int regexp_like(void) { return 0; }\n"),
        ("src/text/utf8/utf8.c", "int nested(void) { return 0; }\n"),
        ("src/sqlite3ext.h", "/* host header */\n"),
        ("test/math.sql", "select 1;\n"),
    ]
}

/// Write a tarball into a fresh temp dir and return both.
pub fn temp_archive(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(format!("sqlean-{}.tar.gz", VERSION));
    fs::write(&path, release_tarball(files)).unwrap();
    (dir, path)
}

/// Write an empty config file so tests never pick up a user config.
pub fn empty_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("amalgamate.toml");
    fs::write(&path, "").unwrap();
    path
}
