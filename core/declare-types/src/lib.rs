//! Core type definitions for declare.
//!
//! This crate defines the format-agnostic building blocks every other
//! declare crate depends on:
//! - [`Value`] / [`ValueKind`]: the in-memory shape of wire and domain values
//! - [`Record`] / [`Layout`]: a record instance and the sealed accessor table
//!   it is indexed by
//! - [`Context`]: the caller-supplied bag threaded through load/dump calls
//! - [`EngineConfig`]: binding configuration handed to transforms
//! - [`DeclareError`]: the error taxonomy shared by engine, schema and records
//!
//! Nothing here knows about transforms or engines; those live in
//! `declare-engine` and `declare-model`.

mod config;
mod context;
mod error;
mod record;
mod value;

pub use config::EngineConfig;
pub use context::Context;
pub use error::{DeclareError, Direction, ErrorKind, Location};
pub use record::{Layout, Record};
pub use value::{Value, ValueKind};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, DeclareError>;
