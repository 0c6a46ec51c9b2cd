// Shared fixtures for the model tests. Not every test file uses every item.
#![allow(dead_code)]

use declare_engine::{
    Capabilities, Context, DeclareError, Result, TransformRef, TypeEngine, TypeTransform, Value,
};
use std::borrow::Cow;
use std::sync::Arc;

/// Doubles integers on load, halves them on dump.
#[derive(Debug, Default)]
pub struct Doubled;

impl TypeTransform for Doubled {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Doubled")
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        value
            .as_i64()
            .map(|i| Value::from(i * 2))
            .ok_or_else(|| DeclareError::conversion("Doubled", "expected an integer"))
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        value
            .as_i64()
            .map(|i| Value::from(i / 2))
            .ok_or_else(|| DeclareError::conversion("Doubled", "expected an integer"))
    }
}

/// Upper-cases strings on load, lower-cases them on dump.
#[derive(Debug, Default)]
pub struct Upper;

impl TypeTransform for Upper {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Upper")
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        value
            .as_str()
            .map(|s| Value::from(s.to_uppercase()))
            .ok_or_else(|| DeclareError::conversion("Upper", "expected a string"))
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        value
            .as_str()
            .map(|s| Value::from(s.to_lowercase()))
            .ok_or_else(|| DeclareError::conversion("Upper", "expected a string"))
    }
}

/// Cannot load.
#[derive(Debug, Default)]
pub struct DumpOnly;

impl TypeTransform for DumpOnly {
    fn load(&self, _engine: &TypeEngine, _value: &Value, _cx: &mut Context) -> Result<Value> {
        Err(DeclareError::conversion("DumpOnly", "load is not supported"))
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::DUMP_ONLY
    }
}

pub fn doubled() -> TransformRef {
    Arc::new(Doubled)
}

pub fn upper() -> TransformRef {
    Arc::new(Upper)
}

pub fn wire(json: &str) -> Value {
    serde_json::from_str(json).unwrap()
}
