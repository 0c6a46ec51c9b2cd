//! Type-transform engine for declare.
//!
//! - [`TypeTransform`]: the load/dump capability every transform implements
//! - [`Strategy`]: a transform bound to one engine's configuration
//! - [`TypeEngine`]: registry and dispatcher: explicit dispatch by transform
//!   identity, dynamic dispatch by value shape, and a lock-free strategy cache
//! - [`compose`]: element-wise helpers for wrapper transforms
//!
//! Engines are shared as `Arc<TypeEngine>` and are safe to call from many
//! threads at once. The strategy cache is the only state that changes after
//! registration, and it is a memo: two threads resolving the same transform
//! compute the same strategy and the last store wins.

pub mod compose;
mod engine;
mod strategy;
mod transform;

pub use declare_types::{
    Context, DeclareError, Direction, EngineConfig, ErrorKind, Location, Result, Value, ValueKind,
};
pub use engine::{TypeEngine, TypeEngineBuilder};
pub use strategy::{ConvertFn, Strategy};
pub use transform::{Capabilities, Passthrough, TransformId, TransformRef, TypeTransform};
