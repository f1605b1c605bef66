//! Archival (MARS-style) key/value metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An ordered mapping of archival descriptor names to values.
///
/// Keys are kept sorted, so iteration order is deterministic and
/// [`MarsKeys::canonical`] yields a stable identity tuple for a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarsKeys {
    keys: BTreeMap<String, String>,
}

impl MarsKeys {
    /// Creates an empty key set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.keys.get(name).map(String::as_str)
    }

    /// Returns whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    /// Inserts or replaces the value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.keys.insert(name.into(), value.into());
    }

    /// Iterates over `(name, value)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns whether the key set is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the canonical sorted `(name, value)` tuple list.
    ///
    /// Two fields carry the same archival identity exactly when their
    /// canonical tuples are equal; this is the key used for duplicate
    /// detection.
    pub fn canonical(&self) -> Vec<(String, String)> {
        self.keys
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MarsKeys {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            keys: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
