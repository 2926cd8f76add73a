//! Partitioning of filtered entries by kind and feature.

use std::collections::BTreeMap;

use crate::source::SourceEntry;

/// Entries of one kind (headers or sources) bucketed by feature.
///
/// Features iterate in ascending byte order of their names; entries inside a
/// feature keep archive order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureGroups {
    groups: BTreeMap<String, Vec<SourceEntry>>,
}

impl FeatureGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to its feature's bucket.
    pub fn push(&mut self, feature: &str, entry: SourceEntry) {
        self.groups.entry(feature.to_string()).or_default().push(entry);
    }

    /// Features with their entries, sorted by feature name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SourceEntry])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Sorted feature names.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn get(&self, feature: &str) -> Option<&[SourceEntry]> {
        self.groups.get(feature).map(Vec::as_slice)
    }

    /// Total number of entries across all features.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Build a new set of groups with every entry passed through `f`.
    pub fn map_entries<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&SourceEntry) -> SourceEntry,
    {
        let groups = self
            .groups
            .iter()
            .map(|(feature, entries)| (feature.clone(), entries.iter().map(&mut f).collect()))
            .collect();
        Self { groups }
    }
}

/// Headers and sources of the filtered tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouped {
    pub headers: FeatureGroups,
    pub sources: FeatureGroups,
}

impl Grouped {
    pub fn len(&self) -> usize {
        self.headers.len() + self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.sources.is_empty()
    }

    /// Union of header and source feature names, sorted and deduplicated.
    pub fn features(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.headers.features().chain(self.sources.features()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Split entries into headers and sources, each bucketed by feature.
///
/// Entries must already have passed the path filter; anything without a
/// feature directory or a `.c`/`.h` extension is dropped with a warning.
pub fn group_entries(entries: Vec<SourceEntry>) -> Grouped {
    let mut grouped = Grouped::default();

    for entry in entries {
        let Some(feature) = entry.feature().map(str::to_string) else {
            tracing::warn!(path = %entry.path, "entry has no feature directory");
            continue;
        };

        if entry.is_header() {
            grouped.headers.push(&feature, entry);
        } else if entry.is_source() {
            grouped.sources.push(&feature, entry);
        } else {
            tracing::warn!(path = %entry.path, "entry is neither header nor source");
        }
    }

    grouped
}
