//! Line-level rewrites applied to every file before it is emitted.
//!
//! Once all files live in one translation unit, quoted includes of sibling
//! files point nowhere, so they are dropped. Everything else is copied
//! byte for byte, line terminators included.

use std::sync::OnceLock;

use regex::bytes::Regex;

/// Quoted (local) include directive anywhere on a line.
const LOCAL_INCLUDE_PATTERN: &str = r#"(?-u)#include\s+"[^"]+"#;

/// A rewrite of file content.
pub trait Transform {
    fn apply(&self, content: &[u8]) -> Vec<u8>;
}

/// Removes every line containing a local `#include "..."` directive.
///
/// System includes (`#include <...>`) are left alone.
pub struct StripLocalIncludes {
    pattern: Regex,
}

impl StripLocalIncludes {
    pub fn new() -> Self {
        Self {
            pattern: local_include_regex().clone(),
        }
    }

    /// Whether a single line (without its terminator) would be removed.
    pub fn matches(&self, line: &[u8]) -> bool {
        self.pattern.is_match(line)
    }
}

impl Default for StripLocalIncludes {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for StripLocalIncludes {
    fn apply(&self, content: &[u8]) -> Vec<u8> {
        let mut result = Vec::with_capacity(content.len());
        for line in content.split_inclusive(|&b| b == b'\n') {
            if !self.matches(trim_terminator(line)) {
                result.extend_from_slice(line);
            }
        }
        result
    }
}

/// Strip local include lines from `content`.
pub fn strip_local_includes(content: &[u8]) -> Vec<u8> {
    StripLocalIncludes::new().apply(content)
}

fn local_include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LOCAL_INCLUDE_PATTERN).expect("local include pattern is valid"))
}

fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
