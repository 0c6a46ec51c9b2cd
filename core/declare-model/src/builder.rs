use crate::{Field, FieldDecl, Meta, Schema};
use declare_engine::{DeclareError, Result, TypeEngine, Value};
use declare_types::Layout;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Collects the field declarations of one record type body.
///
/// Declarations are only gathered here; nothing is checked until
/// [`SchemaBuilder::build`], which either seals a complete [`Schema`] or
/// fails without producing one. A sealed schema cannot be extended in place:
/// deriving a new record type starts a new builder with
/// [`SchemaBuilder::extend`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    base: Option<Arc<Schema>>,
    engine: Option<Arc<TypeEngine>>,
    declared: Vec<(String, FieldDecl)>,
    meta: Meta,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            engine: None,
            declared: Vec::new(),
            meta: Meta::new(),
        }
    }

    /// Starts a derived record type. The base's fields come first, in their
    /// original order; the base's engine and metadata are inherited unless
    /// overridden.
    pub fn extend(name: impl Into<String>, base: &Arc<Schema>) -> Self {
        Self {
            base: Some(Arc::clone(base)),
            ..Self::new(name)
        }
    }

    /// Engine the schema's fields are registered with and dispatched through.
    #[must_use]
    pub fn engine(mut self, engine: Arc<TypeEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Declares a field. Redeclaring an inherited name replaces its transform
    /// without moving it.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, decl: impl Into<FieldDecl>) -> Self {
        self.declared.push((name.into(), decl.into()));
        self
    }

    /// Adds or overrides a metadata entry.
    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Seals the declarations into a schema.
    ///
    /// Fails if one name is declared twice in this body, or if any field's
    /// transform cannot be registered with the engine (missing load/dump, or
    /// rejected by the engine's compatibility filter). On failure nothing is
    /// registered.
    pub fn build(self) -> Result<Arc<Schema>> {
        let engine = match (&self.engine, &self.base) {
            (Some(engine), _) => Arc::clone(engine),
            (None, Some(base)) => Arc::clone(base.engine()),
            (None, None) => TypeEngine::unique(),
        };

        let (mut fields, mut next_order, mut meta) = match &self.base {
            Some(base) => (base.fields.clone(), base.next_order, base.meta.clone()),
            None => (IndexMap::new(), 0, Meta::new()),
        };
        meta.extend(self.meta);

        let mut seen = HashSet::new();
        for (name, decl) in self.declared {
            if !seen.insert(name.clone()) {
                return Err(DeclareError::DuplicateField {
                    schema: self.name,
                    field: name,
                });
            }
            match fields.get_mut(&name) {
                Some(inherited) => inherited.redeclare(decl),
                None => {
                    let field = Field::bind(name.clone(), decl, next_order);
                    next_order += 1;
                    fields.insert(name, field);
                }
            }
        }

        // Check everything before registering anything.
        for field in fields.values() {
            engine.check(field.transform())?;
        }
        for field in fields.values() {
            engine.register(field.transform())?;
        }

        let layout = Arc::new(Layout::new(self.name.clone(), fields.keys().cloned()));
        debug!(
            "Sealed schema `{}` with {} fields on engine `{}`",
            self.name,
            fields.len(),
            engine.namespace()
        );

        Ok(Arc::new(Schema {
            name: self.name,
            fields,
            layout,
            engine,
            meta,
            base: self.base,
            next_order,
        }))
    }
}
