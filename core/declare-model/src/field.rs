use declare_engine::{Passthrough, TransformRef, Value};
use std::fmt;

/// An unbound field declaration: the transform (and optional default) a
/// record type body gives for one name.
///
/// The name and order are assigned when the declaration is handed to a
/// [`SchemaBuilder`](crate::SchemaBuilder).
#[derive(Clone)]
pub struct FieldDecl {
    transform: TransformRef,
    default: Option<Value>,
}

impl FieldDecl {
    /// Domain value used when a loaded wire map lacks this field, or when a
    /// dumped record leaves it unset.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl From<TransformRef> for FieldDecl {
    fn from(transform: TransformRef) -> Self {
        Field::declare(transform)
    }
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("transform", &self.transform.name())
            .field("default", &self.default)
            .finish()
    }
}

/// A declared field of a sealed schema.
///
/// Fields carry no behavior of their own: no validation, no access logic.
/// Values live in [`Record`](crate::Record)s; the field only says which
/// transform converts them and where they sit in declaration order.
#[derive(Clone)]
pub struct Field {
    name: String,
    transform: TransformRef,
    order: usize,
    default: Option<Value>,
}

impl Field {
    /// Declares a field converted by `transform`.
    #[must_use]
    pub fn declare(transform: TransformRef) -> FieldDecl {
        FieldDecl {
            transform,
            default: None,
        }
    }

    /// Declares a field whose values pass through unchanged.
    #[must_use]
    pub fn passthrough() -> FieldDecl {
        Self::declare(Passthrough::shared())
    }

    pub(crate) fn bind(name: String, decl: FieldDecl, order: usize) -> Self {
        Self {
            name,
            transform: decl.transform,
            order,
            default: decl.default,
        }
    }

    /// Replaces the transform and default of an inherited field, keeping its
    /// name and order.
    pub(crate) fn redeclare(&mut self, decl: FieldDecl) {
        self.transform = decl.transform;
        self.default = decl.default;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &TransformRef {
        &self.transform
    }

    /// Declaration order within the schema. Strictly increasing in iteration
    /// order; inherited fields keep the number they had in the base.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("transform", &self.transform.name())
            .field("order", &self.order)
            .field("default", &self.default)
            .finish()
    }
}
