//! Assembly of the amalgamated header and source buffers.
//!
//! Both buffers share one layout: a provenance preamble, a C++ linkage
//! wrapper, and one `#ifdef <PROJECT>_ENABLE_<FEATURE>` block per feature in
//! sorted order. The header also carries the include guard and version
//! macros; the source includes the header and defines the version function.
//!
//! Given the same groups, config and timestamp, the output is byte-identical.

use crate::config::Config;
use crate::features::{c_identifier, guard_macro};
use crate::group::{FeatureGroups, Grouped};
use crate::source::SourceEntry;

const RULE: &str = "// ---------------------------------";

/// Host engine headers every amalgamation depends on.
const HOST_INCLUDES: &[&str] = &["<sqlite3.h>", "<sqlite3ext.h>", "<stddef.h>"];

/// The two emitted files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amalgamation {
    pub header: Vec<u8>,
    pub source: Vec<u8>,
    /// Features that received a guarded block, sorted
    pub features: Vec<String>,
    /// Number of files written across both buffers
    pub files: usize,
}

/// Append-only text buffer with line helpers.
#[derive(Debug, Default)]
struct CodeBuffer {
    bytes: Vec<u8>,
}

impl CodeBuffer {
    fn line(&mut self, text: &str) {
        self.bytes.extend_from_slice(text.as_bytes());
        self.bytes.push(b'\n');
    }

    fn blank(&mut self) {
        self.bytes.push(b'\n');
    }

    /// Copy file content verbatim, terminating an unterminated last line.
    fn content(&mut self, content: &[u8]) {
        self.bytes.extend_from_slice(content);
        if !content.is_empty() && !content.ends_with(b"\n") {
            self.bytes.push(b'\n');
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Builds the header and source buffers for one upstream version.
#[derive(Debug, Clone)]
pub struct Emitter {
    project: String,
    version: String,
    homepage: String,
    header_file: String,
    timestamp: String,
}

impl Emitter {
    /// `timestamp` is embedded verbatim; it is the only input not derived
    /// from the archive and config.
    pub fn new(config: &Config, timestamp: impl Into<String>) -> Self {
        Self {
            project: config.source.project.clone(),
            version: config.source.version.clone(),
            homepage: config.source.homepage.clone(),
            header_file: config.output.header.clone(),
            timestamp: timestamp.into(),
        }
    }

    /// Emit both buffers from already transformed groups.
    pub fn emit(&self, grouped: &Grouped) -> Amalgamation {
        Amalgamation {
            header: self.header(grouped),
            source: self.source(grouped),
            features: grouped.features().into_iter().map(String::from).collect(),
            files: grouped.len(),
        }
    }

    /// Project name as a macro prefix (`SQLEAN`).
    fn macro_prefix(&self) -> String {
        c_identifier(&self.project).to_uppercase()
    }

    /// Include guard derived from the header name (`sqlean.h` -> `SQLEAN_H`).
    pub fn include_guard(&self) -> String {
        c_identifier(&self.header_file).to_uppercase()
    }

    /// Name of the synthesized SQL function reporting the version.
    pub fn version_function(&self) -> String {
        format!("{}_version", c_identifier(&self.project).to_lowercase())
    }

    fn version_macro(&self) -> String {
        format!("{}_VERSION", self.macro_prefix())
    }

    fn version_signature(&self) -> String {
        format!(
            "void {}(sqlite3_context* context, int argc, sqlite3_value** argv)",
            self.version_function()
        )
    }

    fn preamble(&self, buf: &mut CodeBuffer) {
        buf.line(RULE);
        buf.line(&format!(
            "// Following is an amalgamated version of {} v{}",
            self.project, self.version
        ));
        buf.line(&format!("// License @ {}/blob/main/LICENSE", self.homepage));
        buf.line(&format!("// Find more details @ {}", self.homepage));
        buf.line("// All copyrights belong to original author(s)");
        buf.line(RULE);
        buf.blank();
    }

    fn open_linkage(buf: &mut CodeBuffer) {
        // make sure we can call this stuff from c++
        buf.line("#ifdef __cplusplus");
        buf.line("extern \"C\" {");
        buf.line("#endif");
        buf.blank();
    }

    fn close_linkage(buf: &mut CodeBuffer) {
        buf.line("#ifdef __cplusplus");
        buf.line("}");
        buf.line("#endif");
    }

    fn banner(buf: &mut CodeBuffer, entry: &SourceEntry) {
        buf.line(RULE);
        buf.line(&format!("// {}", entry.path));
        buf.line(RULE);
    }

    /// One guarded block per feature of `features`, in order. Features
    /// without entries in `groups` get an empty block.
    fn feature_blocks(&self, buf: &mut CodeBuffer, features: &[&str], groups: &FeatureGroups) {
        for feature in features {
            let guard = guard_macro(&self.project, feature);
            buf.line(&format!("#ifdef {}", guard));
            for entry in groups.get(feature).unwrap_or_default() {
                Self::banner(buf, entry);
                buf.content(&entry.content);
                buf.blank();
            }
            buf.line(&format!("#endif // {}", guard));
        }
    }

    fn version_comment(&self) -> String {
        format!(
            "// add {}() sql function that returns the current version of {}",
            self.version_function(),
            self.project
        )
    }

    /// Header buffer. Every feature of `grouped` gets a block, even one
    /// with no header files.
    pub fn header(&self, grouped: &Grouped) -> Vec<u8> {
        let mut buf = CodeBuffer::default();
        let guard = self.include_guard();

        self.preamble(&mut buf);

        buf.line(&format!("#ifndef {}", guard));
        buf.line(&format!("#define {}", guard));
        buf.blank();

        Self::open_linkage(&mut buf);

        for include in HOST_INCLUDES {
            buf.line(&format!("#include {}", include));
        }
        buf.blank();

        buf.line(&format!(
            "#define {} {}",
            self.version_macro(),
            c_string_literal(&self.version)
        ));
        buf.line(&format!(
            "#define {}_GENERATE_TIMESTAMP {}",
            self.macro_prefix(),
            c_string_literal(&self.timestamp)
        ));
        buf.blank();

        self.feature_blocks(&mut buf, &grouped.features(), &grouped.headers);

        buf.blank();
        buf.line(&self.version_comment());
        buf.line(&format!("{};", self.version_signature()));
        buf.blank();

        Self::close_linkage(&mut buf);

        buf.blank();
        buf.line(&format!("#endif  // {}", guard));

        buf.into_bytes()
    }

    /// Source buffer, with the same feature blocks as the header.
    pub fn source(&self, grouped: &Grouped) -> Vec<u8> {
        let mut buf = CodeBuffer::default();

        self.preamble(&mut buf);

        buf.line(&format!("#include {}", c_string_literal(&self.header_file)));
        buf.blank();

        Self::open_linkage(&mut buf);

        self.feature_blocks(&mut buf, &grouped.features(), &grouped.sources);

        buf.blank();
        buf.line(&self.version_comment());
        buf.line(&format!("{} {{", self.version_signature()));
        buf.line(&format!(
            "  sqlite3_result_text(context, {}, -1, SQLITE_STATIC);",
            self.version_macro()
        ));
        buf.line("}");
        buf.blank();

        Self::close_linkage(&mut buf);

        buf.into_bytes()
    }
}

/// Quote a string as a C string literal.
fn c_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
