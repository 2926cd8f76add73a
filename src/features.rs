//! Registry of known sqlean features.
//!
//! This list is the single source of truth for feature naming: the emitter
//! derives guard macros from it, the default skip list is built from the
//! excluded entries, and the glue layer uses `init_symbol()` to find each
//! feature's entry point in the compiled amalgamation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{AmalgamateError, AmalgamateResult};

/// A named, independently toggleable unit of the upstream source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    /// Directory name under `src/` in the upstream tree
    pub name: &'static str,
    /// Whether the feature is compiled into the amalgamation by default
    pub included: bool,
}

impl Feature {
    const fn included(name: &'static str) -> Self {
        Self {
            name,
            included: true,
        }
    }

    const fn excluded(name: &'static str) -> Self {
        Self {
            name,
            included: false,
        }
    }

    /// C entry point registering this feature with a connection.
    pub fn init_symbol(&self) -> String {
        format!("{}_init", self.name)
    }

    /// Compile-time toggle wrapping the feature's emitted code.
    pub fn guard_macro(&self, project: &str) -> String {
        guard_macro(project, self.name)
    }

    /// Build tag that omits the feature from a binding layer.
    pub fn omit_tag(&self, project: &str) -> String {
        format!("{}_omit_{}", project.to_lowercase(), self.name)
    }

    /// Path prefix of the feature inside the normalized archive.
    pub fn source_prefix(&self) -> String {
        format!("src/{}", self.name)
    }
}

/// Features of the upstream tree, sorted by name.
///
/// `regexp` and `fuzzy` are left out of the amalgamation by default.
pub const FEATURES: &[Feature] = &[
    Feature::included("crypto"),
    Feature::included("define"),
    Feature::included("fileio"),
    Feature::excluded("fuzzy"),
    Feature::included("ipaddr"),
    Feature::included("math"),
    Feature::excluded("regexp"),
    Feature::included("stats"),
    Feature::included("text"),
    Feature::included("unicode"),
    Feature::included("uuid"),
    Feature::included("vsv"),
];

/// Look up a feature by directory name.
pub fn find(name: &str) -> Option<&'static Feature> {
    FEATURES.iter().find(|f| f.name == name)
}

/// Skip prefixes for every feature excluded by default.
pub fn default_skip_prefixes() -> Vec<String> {
    FEATURES
        .iter()
        .filter(|f| !f.included)
        .map(Feature::source_prefix)
        .collect()
}

/// Guard macro for an arbitrary feature name.
///
/// The name is uppercased and anything that cannot appear in a C identifier
/// becomes `_`.
pub fn guard_macro(project: &str, feature: &str) -> String {
    format!(
        "{}_ENABLE_{}",
        c_identifier(project).to_uppercase(),
        c_identifier(feature).to_uppercase()
    )
}

/// Fail when two feature directories sanitise to the same guard macro.
///
/// `foo-bar` and `foo_bar` collide, as do `Math` and `math`.
pub fn ensure_unique_guards<'a>(
    project: &str,
    features: impl IntoIterator<Item = &'a str>,
) -> AmalgamateResult<()> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for feature in features {
        let guard = guard_macro(project, feature);
        if let Some(first) = seen.get(&guard) {
            return Err(AmalgamateError::Group {
                reason: format!(
                    "features '{}' and '{}' both map to guard {}",
                    first, feature, guard
                ),
            });
        }
        seen.insert(guard, feature);
    }
    Ok(())
}

/// Replace every character that is not valid in a C identifier with `_`.
pub(crate) fn c_identifier(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
