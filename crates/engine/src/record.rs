use indexmap::IndexMap;
use rowsift_sheet::Cell;
use serde::{Deserialize, Serialize};

/// A normalized key→value row after header mapping
///
/// Fields keep insertion order. Absent values are never stored: a missing
/// key means "field not provided", which downstream consumers must treat as
/// unknown rather than empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Cell>,
}

impl Record {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Record::default()
    }

    /// Build a record from string pairs, with cell type inference
    #[must_use]
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Record::new();
        for (key, value) in pairs {
            record.insert(key.to_string(), Cell::parse(value));
        }
        record
    }

    /// Set a field; absent values are dropped rather than stored.
    /// Inserting an existing key replaces its value but keeps its position.
    pub fn insert(&mut self, key: String, value: Cell) {
        if value.is_absent() {
            return;
        }
        self.fields.insert(key, value);
    }

    /// Get a field value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.fields.get(key)
    }

    /// Check whether a field is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the record has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Cell)> {
        self.fields.iter()
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Check whether any field's text contains the (already lowercased)
    /// search term. Absent fields contribute no text and never match.
    #[must_use]
    pub fn matches_search(&self, term_lower: &str) -> bool {
        if term_lower.is_empty() {
            return true;
        }
        self.fields
            .values()
            .any(|value| value.as_str().to_lowercase().contains(term_lower))
    }
}
