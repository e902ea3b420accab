//! Extracted strings and the merge policy for repeated values.

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A translatable string found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedString {
    pub filename: PathBuf,
    pub value: String,
    /// 0-indexed byte offset of the literal.
    pub offset: usize,
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed byte column.
    pub column: usize,
    /// Locales the string applies to. `None` means all locales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,
}

/// Union of two locale scopes.
///
/// An unscoped side (`None` or empty) makes the result unscoped: a string
/// used anywhere without scoping applies to every locale. Otherwise the
/// result is the sorted, duplicate-free union.
pub fn merge_locales(a: Option<Vec<String>>, b: Option<Vec<String>>) -> Option<Vec<String>> {
    match (a, b) {
        (Some(mut a), Some(b)) if !a.is_empty() && !b.is_empty() => {
            a.extend(b);
            a.sort();
            a.dedup();
            Some(a)
        }
        _ => None,
    }
}

/// Extracted strings keyed by value.
///
/// Ordered by value so serialized output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: BTreeMap<String, ExtractedString>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a string. A repeated value keeps the newer position and the
    /// merged locale scope.
    pub fn record(&mut self, mut info: ExtractedString) {
        match self.entries.entry(info.value.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(info);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                info.locales = merge_locales(existing.locales.take(), info.locales);
                *existing = info;
            }
        }
    }

    /// Fold another result set into this one, record by record.
    pub fn merge(&mut self, other: ResultSet) {
        for info in other {
            self.record(info);
        }
    }

    pub fn get(&self, value: &str) -> Option<&ExtractedString> {
        self.entries.get(value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &ExtractedString> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl IntoIterator for ResultSet {
    type Item = ExtractedString;
    type IntoIter = btree_map::IntoValues<String, ExtractedString>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
