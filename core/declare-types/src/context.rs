//! Caller-supplied context threaded through every load/dump call.

use crate::Value;
use std::collections::BTreeMap;

/// An opaque key/value bag handed to every transform in a call tree.
///
/// The engine never reads it. Transforms use it for ambient information, such
/// as choosing a nested transform from a sibling field, or for bookkeeping
/// the caller wants back afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: BTreeMap<String, Value>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Adds one to an integer counter, starting from zero and saturating at
    /// `i64::MAX`. Non-integer entries are replaced.
    pub fn increment(&mut self, key: &str) -> i64 {
        let next = self
            .entries
            .get(key)
            .and_then(Value::as_i64)
            .unwrap_or(0)
            .saturating_add(1);
        self.entries.insert(key.to_string(), Value::Int(next));
        next
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
