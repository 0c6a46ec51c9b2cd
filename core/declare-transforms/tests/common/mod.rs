// Shared fixtures for the transform tests. Not every test file uses every item.
#![allow(dead_code)]

use declare_engine::{TransformRef, Value};
use declare_model::Schema;
use declare_transforms::{Delimited, Lookup};
use std::sync::Arc;

pub fn block_type() -> TransformRef {
    Arc::new(Lookup::new(
        "BlockType",
        [(0, "Grass"), (1, "Stone"), (2, "Diamond")],
    ))
}

pub fn position() -> TransformRef {
    Arc::new(Delimited::new(":").with_arity(3))
}

/// `Block { type: BlockType, position: "x:y:z" }`
pub fn block_schema() -> Arc<Schema> {
    Schema::builder("Block")
        .field("type", block_type())
        .field("position", position())
        .build()
        .unwrap()
}

pub fn wire(json: &str) -> Value {
    serde_json::from_str(json).unwrap()
}

pub fn ints(items: &[i64]) -> Value {
    items.iter().map(|&i| Value::Int(i)).collect()
}
