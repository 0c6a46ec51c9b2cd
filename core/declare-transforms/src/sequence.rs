use declare_engine::compose;
use declare_engine::{
    Context, DeclareError, Result, TransformRef, TypeEngine, TypeTransform, Value, ValueKind,
};
use std::borrow::Cow;
use std::sync::Arc;

/// An ordered collection whose elements all use one inner transform.
///
/// Each element is converted exactly once, in order. The first failing
/// element aborts the whole conversion.
#[derive(Debug, Clone)]
pub struct Sequence {
    inner: TransformRef,
    name: String,
}

impl Sequence {
    pub fn new(inner: TransformRef) -> Self {
        let name = format!("Sequence<{}>", inner.name());
        Self { inner, name }
    }

    /// Shorthand for `Arc::new(Sequence::new(inner))`.
    pub fn of(inner: TransformRef) -> TransformRef {
        Arc::new(Self::new(inner))
    }

    pub fn inner(&self) -> &TransformRef {
        &self.inner
    }

    fn items<'a>(&self, value: &'a Value) -> Result<&'a [Value]> {
        value.as_seq().ok_or_else(|| {
            DeclareError::conversion(
                self.name.as_str(),
                format!("expected a sequence, got {}", value.kind()),
            )
        })
    }
}

impl TypeTransform for Sequence {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn load(&self, engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        let items = self.items(value)?;
        compose::load_each(engine, &self.name, &self.inner, items, cx).map(Value::Seq)
    }

    fn dump(&self, engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        let items = self.items(value)?;
        compose::dump_each(engine, &self.name, &self.inner, items, cx).map(Value::Seq)
    }

    fn wire_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Seq)
    }

    fn domain_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Seq)
    }

    fn children(&self) -> Vec<TransformRef> {
        vec![Arc::clone(&self.inner)]
    }
}
