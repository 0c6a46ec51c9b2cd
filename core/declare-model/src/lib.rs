//! Declarative record model for declare.
//!
//! - [`Field`]: a name bound to a transform, with its declaration order
//! - [`SchemaBuilder`]: collects field declarations (including inherited
//!   ones) and seals them into a [`Schema`]
//! - [`Schema`]: the immutable, ordered field table of a record type plus
//!   the engine its fields are dispatched through. A schema is itself a
//!   transform, so record types nest.
//!
//! ```
//! use declare_model::{Field, Schema};
//! use declare_engine::{Context, Value};
//!
//! let point = Schema::builder("Point")
//!     .field("x", Field::passthrough())
//!     .field("y", Field::passthrough())
//!     .build()
//!     .unwrap();
//!
//! let wire: Value = serde_json::from_str(r#"{"x": 1, "y": 2}"#).unwrap();
//! let mut cx = Context::new();
//! let record = point.load_record(&wire, &mut cx).unwrap();
//! assert_eq!(record.get("y").unwrap(), &Value::Int(2));
//! ```

mod builder;
mod field;
mod schema;

pub use builder::SchemaBuilder;
pub use declare_types::{Layout, Record};
pub use field::{Field, FieldDecl};
pub use schema::{Meta, Schema};
