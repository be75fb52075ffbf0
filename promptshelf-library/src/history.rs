//! Per-variable history of previously entered values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of values kept per variable unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Recently used values for each variable name, most recent first
///
/// Values are unique within a name and each list holds at most
/// [`capacity`](Self::capacity) entries. Serialized as a plain
/// `{ "name": ["newest", ...] }` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct VariableHistory {
    entries: BTreeMap<String, Vec<String>>,
    capacity: usize,
}

impl Default for VariableHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl VariableHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty history keeping at most `capacity` values per name (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the bound, truncating lists that are now too long
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        for values in self.entries.values_mut() {
            values.truncate(self.capacity);
        }
    }

    /// Put `value` at the front of `name`'s list
    ///
    /// An equal value already in the list is moved rather than repeated.
    pub fn record_value(&mut self, name: &str, value: &str) {
        let values = self.entries.entry(name.to_string()).or_default();
        values.retain(|existing| existing != value);
        values.insert(0, value.to_string());
        values.truncate(self.capacity);
    }

    /// Remove the value at `index` from `name`'s list
    ///
    /// Returns `None` without touching anything when the name is unknown or
    /// the index is out of range. A list that becomes empty is dropped.
    pub fn delete_value(&mut self, name: &str, index: usize) -> Option<String> {
        let values = self.entries.get_mut(name)?;
        if index >= values.len() {
            return None;
        }
        let removed = values.remove(index);
        if values.is_empty() {
            self.entries.remove(name);
        }
        Some(removed)
    }

    /// Values for `name`, newest first (empty for unknown names)
    pub fn values(&self, name: &str) -> &[String] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names with at least one recorded value, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a history from stored lists, bounded by `capacity`
    ///
    /// Repeated values keep their first (newest) position and empty lists
    /// are dropped.
    pub fn from_raw(raw: BTreeMap<String, Vec<String>>, capacity: usize) -> Self {
        let mut history = Self::with_capacity(capacity);
        for (name, values) in raw {
            let mut unique: Vec<String> = Vec::with_capacity(values.len());
            for value in values {
                if !unique.contains(&value) {
                    unique.push(value);
                }
            }
            unique.truncate(history.capacity);
            if !unique.is_empty() {
                history.entries.insert(name, unique);
            }
        }
        history
    }

    /// Replace the stored values, keeping this history's capacity
    pub fn replace_with(&mut self, other: VariableHistory) {
        let capacity = self.capacity;
        *self = other;
        self.set_capacity(capacity);
    }
}

impl From<BTreeMap<String, Vec<String>>> for VariableHistory {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        Self::from_raw(raw, DEFAULT_HISTORY_CAPACITY)
    }
}

impl From<VariableHistory> for BTreeMap<String, Vec<String>> {
    fn from(history: VariableHistory) -> Self {
        history.entries
    }
}
