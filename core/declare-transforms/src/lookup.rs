use declare_engine::{Context, DeclareError, Result, TypeEngine, TypeTransform, Value, ValueKind};
use std::borrow::Cow;

/// A fixed table of wire values and the domain values they stand for.
///
/// Both sides must be unique; the first matching entry wins otherwise. Values
/// outside the table fail rather than passing through.
///
/// ```
/// use std::sync::Arc;
/// use declare_engine::{Context, TransformRef, TypeEngine, Value};
/// use declare_transforms::Lookup;
///
/// let blocks: TransformRef = Arc::new(Lookup::new(
///     "BlockType",
///     [(0, "Grass"), (1, "Stone"), (2, "Diamond")],
/// ));
/// let engine = TypeEngine::unique();
/// engine.register(&blocks).unwrap();
///
/// let mut cx = Context::new();
/// assert_eq!(engine.load(&blocks, &Value::from(1), &mut cx).unwrap(), Value::from("Stone"));
/// assert_eq!(engine.dump(&blocks, &Value::from("Diamond"), &mut cx).unwrap(), Value::from(2));
/// ```
#[derive(Debug, Clone)]
pub struct Lookup {
    name: String,
    entries: Vec<(Value, Value)>,
    wire_kind: Option<ValueKind>,
    domain_kind: Option<ValueKind>,
}

impl Lookup {
    pub fn new<I, W, D>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (W, D)>,
        W: Into<Value>,
        D: Into<Value>,
    {
        let entries: Vec<(Value, Value)> = entries
            .into_iter()
            .map(|(w, d)| (w.into(), d.into()))
            .collect();
        let wire_kind = common_kind(entries.iter().map(|(w, _)| w));
        let domain_kind = common_kind(entries.iter().map(|(_, d)| d));
        Self {
            name: name.into(),
            entries,
            wire_kind,
            domain_kind,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn no_entry(&self, value: &Value) -> DeclareError {
        DeclareError::conversion(
            self.name.as_str(),
            format!("no entry for {}", value.to_json()),
        )
    }
}

/// The kind shared by every value, if there is exactly one.
fn common_kind<'a>(mut values: impl Iterator<Item = &'a Value>) -> Option<ValueKind> {
    let first = values.next()?.kind();
    values.all(|v| v.kind() == first).then_some(first)
}

impl TypeTransform for Lookup {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        self.entries
            .iter()
            .find(|(wire, _)| wire == value)
            .map(|(_, domain)| domain.clone())
            .ok_or_else(|| self.no_entry(value))
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        self.entries
            .iter()
            .find(|(_, domain)| domain == value)
            .map(|(wire, _)| wire.clone())
            .ok_or_else(|| self.no_entry(value))
    }

    fn wire_kind(&self) -> Option<ValueKind> {
        self.wire_kind
    }

    fn domain_kind(&self) -> Option<ValueKind> {
        self.domain_kind
    }
}
