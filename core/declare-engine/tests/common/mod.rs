// Shared fixtures for the engine tests. Not every test file uses every item.
#![allow(dead_code)]

use declare_engine::{
    Capabilities, ConvertFn, Context, DeclareError, Direction, EngineConfig, Result,
    TransformRef, TypeEngine, TypeTransform, Value, ValueKind,
};
use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Appends `::test` on dump and strips it on load.
#[derive(Debug, Default)]
pub struct Suffix;

impl TypeTransform for Suffix {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Suffix")
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        let s = value
            .as_str()
            .ok_or_else(|| DeclareError::conversion("Suffix", "expected a string"))?;
        Ok(Value::from(s.strip_suffix("::test").unwrap_or(s)))
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        let s = value
            .as_str()
            .ok_or_else(|| DeclareError::conversion("Suffix", "expected a string"))?;
        Ok(Value::from(format!("{s}::test")))
    }
}

/// Domain strings holding digits, wire integers. Counts binds and calls.
#[derive(Debug, Default)]
pub struct NumericString {
    pub binds: AtomicUsize,
}

impl TypeTransform for NumericString {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("NumericString")
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        cx.increment("load");
        let i = value
            .as_i64()
            .ok_or_else(|| DeclareError::conversion("NumericString", "expected an integer"))?;
        Ok(Value::from(i.to_string()))
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        cx.increment("dump");
        let s = value
            .as_str()
            .ok_or_else(|| DeclareError::conversion("NumericString", "expected a string"))?;
        s.parse::<i64>()
            .map(Value::from)
            .map_err(|e| DeclareError::conversion("NumericString", e.to_string()))
    }

    fn bind_load(&self, _config: &EngineConfig) -> Option<ConvertFn> {
        self.binds.fetch_add(1, Ordering::SeqCst);
        None
    }

    fn wire_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Int)
    }

    fn domain_kind(&self) -> Option<ValueKind> {
        Some(ValueKind::Str)
    }
}

/// Only knows how to dump.
#[derive(Debug, Default)]
pub struct WriteOnly;

impl TypeTransform for WriteOnly {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("WriteOnly")
    }

    fn load(&self, _engine: &TypeEngine, _value: &Value, _cx: &mut Context) -> Result<Value> {
        Err(DeclareError::conversion("WriteOnly", "load is not supported"))
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::DUMP_ONLY
    }
}

/// Multiplies integers by the engine's configured `scale` on dump.
#[derive(Debug, Default)]
pub struct Scaled;

impl TypeTransform for Scaled {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Scaled")
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }

    fn bind_dump(&self, config: &EngineConfig) -> Option<ConvertFn> {
        let scale = config.get_i64("scale")?;
        Some(Arc::new(move |_engine: &TypeEngine, value: &Value, _cx: &mut Context| {
            value
                .as_i64()
                .map(|i| Value::from(i * scale))
                .ok_or_else(|| DeclareError::conversion("Scaled", "expected an integer"))
        }))
    }
}

/// Records that it was told about registration.
#[derive(Debug, Default)]
pub struct Notify {
    pub registered: AtomicUsize,
}

impl TypeTransform for Notify {
    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }

    fn on_register(&self, _engine: &TypeEngine) {
        self.registered.fetch_add(1, Ordering::SeqCst);
    }
}

/// Loads/dumps a sequence by delegating to `inner` for each element.
#[derive(Debug)]
pub struct Each {
    pub inner: TransformRef,
}

impl TypeTransform for Each {
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("Each<{}>", self.inner.name()))
    }

    fn load(&self, engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        let items = value
            .as_seq()
            .ok_or_else(|| DeclareError::conversion(self.name(), "expected a sequence"))?;
        declare_engine::compose::load_each(engine, &self.name(), &self.inner, items, cx)
            .map(Value::Seq)
    }

    fn dump(&self, engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        let items = value
            .as_seq()
            .ok_or_else(|| DeclareError::conversion(self.name(), "expected a sequence"))?;
        declare_engine::compose::dump_each(engine, &self.name(), &self.inner, items, cx)
            .map(Value::Seq)
    }

    fn children(&self) -> Vec<TransformRef> {
        vec![Arc::clone(&self.inner)]
    }
}

/// Strings of at most `max` characters, unchanged in both directions.
#[derive(Debug)]
pub struct MaxLen {
    pub max: usize,
}

impl TypeTransform for MaxLen {
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("MaxLen<{}>", self.max))
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }

    fn accepts(&self, _direction: Direction, value: &Value) -> bool {
        value.as_str().is_some_and(|s| s.chars().count() <= self.max)
    }
}

/// A unique engine with `transforms` registered.
pub fn engine_for(transforms: &[&TransformRef]) -> Arc<TypeEngine> {
    let engine = TypeEngine::unique();
    for transform in transforms {
        engine.register(transform).unwrap();
    }
    engine
}

/// Installs a test-writer subscriber once; `RUST_LOG=declare_engine=debug` shows engine events.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .with_target(false)
        .compact()
        .try_init();
}
