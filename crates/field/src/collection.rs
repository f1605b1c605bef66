//! Ordered collections of fields.

use std::collections::BTreeSet;
use std::ops::Index;
use std::slice;

use crate::field::Field;

/// Sort key component used by [`FieldCollection::order_by`].
///
/// Missing keys order before any present value; values that parse as
/// integers compare numerically so `step=2` sorts before `step=12`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum OrderKey {
    Missing,
    Int(i64),
    Text(String),
}

impl OrderKey {
    fn from_metadata(value: Option<&str>) -> Self {
        match value {
            None => OrderKey::Missing,
            Some(v) => match v.parse::<i64>() {
                Ok(n) => OrderKey::Int(n),
                Err(_) => OrderKey::Text(v.to_string()),
            },
        }
    }
}

/// Distinct values observed for one metadata key across a collection.
#[derive(Debug, Clone, Default)]
pub struct UniqueValues {
    values: BTreeSet<String>,
    missing: usize,
}

impl UniqueValues {
    /// Returns the distinct values, in sorted order.
    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    /// Returns the number of distinct values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether no values were observed at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns how many fields lacked the key entirely.
    pub fn missing(&self) -> usize {
        self.missing
    }

    /// Returns whether any field lacked the key.
    pub fn has_missing(&self) -> bool {
        self.missing > 0
    }
}

/// An ordered sequence of [`Field`]s.
#[derive(Debug, Clone, Default)]
pub struct FieldCollection {
    fields: Vec<Field>,
}

impl FieldCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the field at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Iterates over the fields in order.
    pub fn iter(&self) -> slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Returns a new collection sorted by the given metadata keys.
    ///
    /// Fields compare lexicographically over the per-key [`OrderKey`]s, so
    /// ordering is total and deterministic even when some keys are absent.
    pub fn order_by(&self, keys: &[&str]) -> FieldCollection {
        let mut fields = self.fields.clone();
        fields.sort_by_cached_key(|f| {
            keys.iter()
                .map(|k| OrderKey::from_metadata(f.metadata(k)))
                .collect::<Vec<_>>()
        });
        FieldCollection { fields }
    }

    /// Returns the distinct values of `key` across the collection, along
    /// with a count of fields where the key is absent.
    pub fn unique_values(&self, key: &str) -> UniqueValues {
        let mut unique = UniqueValues::default();
        for field in &self.fields {
            match field.metadata(key) {
                Some(v) => {
                    unique.values.insert(v.to_string());
                }
                None => unique.missing += 1,
            }
        }
        unique
    }
}

impl From<Vec<Field>> for FieldCollection {
    fn from(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

impl Index<usize> for FieldCollection {
    type Output = Field;

    fn index(&self, index: usize) -> &Field {
        &self.fields[index]
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = &'a Field;
    type IntoIter = slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl IntoIterator for FieldCollection {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
