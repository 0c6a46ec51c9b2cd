use declare_engine::{
    ConvertFn, Context, DeclareError, EngineConfig, Result, TypeEngine, TypeTransform, Value,
    ValueKind,
};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

/// Engine config key holding the number of decimal places to keep.
pub const PRECISION_KEY: &str = "float_precision";

/// Floats in both directions, rounded on dump to the engine's
/// [`PRECISION_KEY`] setting. Engines without the setting dump floats as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Precision;

fn as_float(value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| DeclareError::conversion("Precision", "expected a number"))
}

impl TypeTransform for Precision {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Precision")
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        as_float(value).map(Value::Float)
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        as_float(value).map(Value::Float)
    }

    fn bind_dump(&self, config: &EngineConfig) -> Option<ConvertFn> {
        let places = config.get_i64(PRECISION_KEY)?;
        let places = i32::try_from(places.clamp(0, 15)).unwrap_or(15);
        debug!("Binding Precision with {places} decimal places");
        let scale = 10f64.powi(places);
        Some(Arc::new(
            move |_engine: &TypeEngine, value: &Value, _cx: &mut Context| {
                as_float(value).map(|f| Value::Float((f * scale).round() / scale))
            },
        ))
    }

    fn wire_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Float)
    }

    fn domain_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Float)
    }
}
