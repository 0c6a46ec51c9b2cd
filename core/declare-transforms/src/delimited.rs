use declare_engine::{Context, DeclareError, Result, TypeEngine, TypeTransform, Value, ValueKind};
use std::borrow::Cow;

/// Integers joined by a separator on the wire, a sequence of integers in the
/// domain: `"1:2:3"` <-> `[1, 2, 3]`.
///
/// An optional arity rejects strings or sequences with the wrong number of
/// parts in either direction.
#[derive(Debug, Clone)]
pub struct Delimited {
    separator: String,
    arity: Option<usize>,
}

impl Delimited {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            arity: None,
        }
    }

    /// Requires exactly `arity` parts.
    #[must_use]
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    fn check_arity(&self, found: usize) -> Result<()> {
        match self.arity {
            Some(expected) if expected != found => Err(DeclareError::conversion(
                "Delimited",
                format!("expected {expected} parts, got {found}"),
            )),
            _ => Ok(()),
        }
    }
}

impl TypeTransform for Delimited {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Delimited")
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| DeclareError::conversion("Delimited", "expected a string"))?;
        let parts: Vec<&str> = if text.is_empty() {
            Vec::new()
        } else {
            text.split(self.separator.as_str()).collect()
        };
        self.check_arity(parts.len())?;

        parts
            .into_iter()
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|e| DeclareError::conversion("Delimited", format!("`{part}`: {e}")))
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Seq)
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        let items = value
            .as_seq()
            .ok_or_else(|| DeclareError::conversion("Delimited", "expected a sequence"))?;
        self.check_arity(items.len())?;

        let parts = items
            .iter()
            .map(|item| {
                item.as_i64()
                    .map(|i| i.to_string())
                    .ok_or_else(|| DeclareError::conversion("Delimited", "expected integers"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::from(parts.join(self.separator.as_str())))
    }

    fn wire_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Str)
    }

    fn domain_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Seq)
    }
}
