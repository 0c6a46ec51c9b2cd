//! Record instances and the accessor table they are indexed by.
//!
//! A sealed schema produces one [`Layout`]: the ordered list of declared field
//! names. Every [`Record`] of that schema shares the layout and stores its
//! values in a slot vector, so field access is a table lookup rather than a
//! search through the declarations.

use crate::{DeclareError, Result, Value};
use indexmap::IndexSet;
use std::sync::Arc;

/// Ordered name -> slot table produced by a sealed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    schema: String,
    names: IndexSet<String>,
}

impl Layout {
    /// Creates a layout for `schema` with slots in the given order.
    ///
    /// Repeated names collapse into their first position; schemas check for
    /// duplicates before they get here.
    pub fn new<I, S>(schema: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema: schema.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the schema this layout was sealed from.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Slot index for a field name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    /// Field name at a slot index.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get_index(index).map(String::as_str)
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn unknown(&self, field: &str) -> DeclareError {
        DeclareError::UnknownField {
            schema: self.schema.clone(),
            field: field.to_string(),
        }
    }

    fn missing(&self, field: &str) -> DeclareError {
        DeclareError::MissingField {
            schema: self.schema.clone(),
            field: field.to_string(),
        }
    }
}

/// A mapping from declared field name to domain value.
///
/// Slots start out unset. Reading an unset slot or a name the schema does not
/// declare is an error rather than a silent default.
#[derive(Debug, Clone)]
pub struct Record {
    layout: Arc<Layout>,
    slots: Vec<Option<Value>>,
}

impl Record {
    /// Creates an empty record for the given layout.
    #[must_use]
    pub fn new(layout: Arc<Layout>) -> Self {
        let slots = vec![None; layout.len()];
        Self { layout, slots }
    }

    /// The accessor table this record is indexed by.
    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// Name of the schema this record belongs to.
    pub fn schema_name(&self) -> &str {
        self.layout.schema()
    }

    /// Returns the value of a field.
    pub fn get(&self, name: &str) -> Result<&Value> {
        let index = self
            .layout
            .index_of(name)
            .ok_or_else(|| self.layout.unknown(name))?;
        self.slots[index]
            .as_ref()
            .ok_or_else(|| self.layout.missing(name))
    }

    /// Sets a field, returning the previous value if there was one.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        let index = self
            .layout
            .index_of(name)
            .ok_or_else(|| self.layout.unknown(name))?;
        Ok(self.slots[index].replace(value.into()))
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Clears a field, returning its value. Clearing an unset field is an error.
    pub fn remove(&mut self, name: &str) -> Result<Value> {
        let index = self
            .layout
            .index_of(name)
            .ok_or_else(|| self.layout.unknown(name))?;
        self.slots[index]
            .take()
            .ok_or_else(|| self.layout.missing(name))
    }

    /// Returns true if the field is declared and set.
    pub fn contains(&self, name: &str) -> bool {
        self.layout
            .index_of(name)
            .is_some_and(|index| self.slots[index].is_some())
    }

    /// Slot access by index; `None` when unset or out of range.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Sets a slot by index. Returns false if the index is out of range.
    pub fn set_index(&mut self, index: usize, value: Value) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Set fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.layout
            .names()
            .zip(&self.slots)
            .filter_map(|(name, slot)| slot.as_ref().map(|v| (name, v)))
    }

    /// Number of set fields.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.layout, &other.layout) || self.layout == other.layout)
            && self.slots == other.slots
    }
}
