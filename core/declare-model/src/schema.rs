//! Sealed record schemas.

use crate::{Field, SchemaBuilder};
use declare_engine::compose::at_field;
use declare_engine::{
    Context, DeclareError, Direction, Result, TransformRef, TypeEngine, TypeTransform, Value,
    ValueKind,
};
use declare_types::{Layout, Record};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Free-form metadata attached to a schema. Derived schemas start from a copy
/// of their base's metadata.
pub type Meta = BTreeMap<String, Value>;

/// The immutable field table of a record type.
///
/// Iteration order is declaration order, with inherited fields first. The
/// schema also owns the [`Layout`] its records are indexed by and the engine
/// its field transforms are dispatched through.
///
/// A schema is a [`TypeTransform`] in its own right: it loads a wire map into
/// a [`Record`] and dumps a record back into a map, so one record type can be
/// a field of another.
pub struct Schema {
    pub(crate) name: String,
    pub(crate) fields: IndexMap<String, Field>,
    pub(crate) layout: Arc<Layout>,
    pub(crate) engine: Arc<TypeEngine>,
    pub(crate) meta: Meta,
    pub(crate) base: Option<Arc<Schema>>,
    pub(crate) next_order: usize,
}

impl Schema {
    /// Starts declaring a record type.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Starts declaring a record type derived from `base`.
    pub fn extend(self: &Arc<Self>, name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::extend(name, self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Slot index of a field in this schema's records.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.layout.index_of(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn engine(&self) -> &Arc<TypeEngine> {
        &self.engine
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The schema this one was derived from, if any.
    pub fn base(&self) -> Option<&Arc<Schema>> {
        self.base.as_ref()
    }

    /// True if `self` is `other` or was derived from it, directly or not.
    pub fn derives_from(&self, other: &Schema) -> bool {
        let mut current = Some(self);
        while let Some(schema) = current {
            if std::ptr::eq(schema, other) {
                return true;
            }
            current = schema.base.as_deref();
        }
        false
    }

    /// A shared transform handle for nesting this record type in another.
    pub fn as_transform(self: &Arc<Self>) -> TransformRef {
        Arc::clone(self) as TransformRef
    }

    /// An empty record of this type.
    pub fn new_record(&self) -> Record {
        Record::new(Arc::clone(&self.layout))
    }

    /// Loads a wire map into a record, field by field in declaration order.
    ///
    /// Keys the schema does not declare are ignored. A declared key that is
    /// absent takes the field's default, or fails with
    /// [`DeclareError::MissingField`] if there is none.
    pub fn load_record(&self, value: &Value, cx: &mut Context) -> Result<Record> {
        let wire = value.as_map().ok_or_else(|| {
            DeclareError::conversion(
                self.name.as_str(),
                format!("expected a map, got {}", value.kind()),
            )
        })?;

        let mut record = self.new_record();
        for (index, field) in self.fields.values().enumerate() {
            let loaded = match wire.get(field.name()) {
                Some(raw) => self
                    .engine
                    .load(field.transform(), raw, cx)
                    .map_err(at_field(&self.name, field.name()))?,
                None => field
                    .default()
                    .cloned()
                    .ok_or_else(|| self.missing(field))?,
            };
            record.set_index(index, loaded);
        }
        Ok(record)
    }

    /// Dumps a record of this type into a wire map in declaration order.
    ///
    /// An unset field is dumped from its default, or fails with
    /// [`DeclareError::MissingField`] if there is none.
    pub fn dump_record(&self, record: &Record, cx: &mut Context) -> Result<Value> {
        if !Arc::ptr_eq(record.layout(), &self.layout) && **record.layout() != *self.layout {
            return Err(DeclareError::conversion(
                self.name.as_str(),
                format!("expected a `{}` record, got `{}`", self.name, record.schema_name()),
            ));
        }

        let mut wire = IndexMap::with_capacity(self.fields.len());
        for (index, field) in self.fields.values().enumerate() {
            let domain = match record.get_index(index).or(field.default()) {
                Some(domain) => domain,
                None => return Err(self.missing(field)),
            };
            let dumped = self
                .engine
                .dump(field.transform(), domain, cx)
                .map_err(at_field(&self.name, field.name()))?;
            wire.insert(field.name().to_string(), dumped);
        }
        Ok(Value::Map(wire))
    }

    fn missing(&self, field: &Field) -> DeclareError {
        DeclareError::MissingField {
            schema: self.name.clone(),
            field: field.name().to_string(),
        }
    }
}

impl TypeTransform for Schema {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    /// Field transforms run on the schema's own engine, whichever engine the
    /// record itself was dispatched through.
    fn load(&self, _engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        self.load_record(value, cx).map(Value::Record)
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        let record = value.as_record().ok_or_else(|| {
            DeclareError::conversion(
                self.name.as_str(),
                format!("expected a record, got {}", value.kind()),
            )
        })?;
        self.dump_record(record, cx)
    }

    fn wire_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Map)
    }

    fn domain_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Record)
    }

    /// Dumps only records this schema built. Loads only maps carrying every
    /// field that has no default.
    fn accepts(&self, direction: Direction, value: &Value) -> bool {
        match direction {
            Direction::Load => value.as_map().is_some_and(|wire| {
                self.fields
                    .values()
                    .all(|field| field.default().is_some() || wire.contains_key(field.name()))
            }),
            Direction::Dump => value
                .as_record()
                .is_some_and(|record| Arc::ptr_eq(record.layout(), &self.layout)),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields.values().collect::<Vec<_>>())
            .field("engine", &self.engine.namespace())
            .field("base", &self.base.as_ref().map(|b| b.name.as_str()))
            .finish_non_exhaustive()
    }
}
