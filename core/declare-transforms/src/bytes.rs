use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use declare_engine::{Context, DeclareError, Result, TypeEngine, TypeTransform, Value, ValueKind};
use std::borrow::Cow;

/// Bytes in the domain, standard base64 text on the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Bytes;

impl TypeTransform for Base64Bytes {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Base64Bytes")
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| DeclareError::conversion("Base64Bytes", "expected a string"))?;
        STANDARD
            .decode(text)
            .map(Value::Bytes)
            .map_err(|e| DeclareError::conversion("Base64Bytes", e.to_string()))
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        let bytes = value
            .as_bytes()
            .ok_or_else(|| DeclareError::conversion("Base64Bytes", "expected bytes"))?;
        Ok(Value::from(STANDARD.encode(bytes)))
    }

    fn wire_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Str)
    }

    fn domain_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Bytes)
    }
}
