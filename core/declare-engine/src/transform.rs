//! The type-transform capability.

use crate::{ConvertFn, TypeEngine};
use declare_types::{Context, Direction, EngineConfig, Result, Value, ValueKind};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a transform. Transforms are usually created once and
/// referenced from many fields and engines.
pub type TransformRef = Arc<dyn TypeTransform>;

/// A bidirectional mapping between a wire value and a domain value.
///
/// `load` turns wire into domain, `dump` turns domain into wire. Both should
/// be pure functions of their arguments; a transform that keeps mutable state
/// must synchronize it itself, since engines call transforms from any thread.
///
/// Wrapper transforms (a sequence of `T`, a record of fields) call back into
/// the `engine` they are handed for their inner transforms, and list those
/// inner transforms in [`TypeTransform::children`] so registering the wrapper
/// registers everything it needs.
pub trait TypeTransform: fmt::Debug + Send + Sync {
    /// Name used in errors and logs.
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// Wire value -> domain value.
    fn load(&self, engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value>;

    /// Domain value -> wire value.
    fn dump(&self, engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value>;

    /// Which of load/dump this transform implements. Engines refuse to
    /// register a transform missing either one.
    fn capabilities(&self) -> Capabilities {
        Capabilities::BOTH
    }

    /// Returns a load function specialized for an engine's configuration.
    ///
    /// `None` (the default) means [`TypeTransform::load`] is used as-is.
    fn bind_load(&self, config: &EngineConfig) -> Option<ConvertFn> {
        let _ = config;
        None
    }

    /// Returns a dump function specialized for an engine's configuration.
    ///
    /// `None` (the default) means [`TypeTransform::dump`] is used as-is.
    fn bind_dump(&self, config: &EngineConfig) -> Option<ConvertFn> {
        let _ = config;
        None
    }

    /// Shape of the wire values this transform loads, if it has a single one.
    /// Used by dynamic dispatch on `load`.
    fn wire_kind(&self) -> Option<ValueKind> {
        None
    }

    /// Shape of the domain values this transform dumps, if it has a single one.
    /// Used by dynamic dispatch on `dump`.
    fn domain_kind(&self) -> Option<ValueKind> {
        None
    }

    /// Whether dynamic dispatch may hand `value` to this transform in
    /// `direction`.
    ///
    /// Defaults to comparing the value's kind with [`TypeTransform::wire_kind`]
    /// (load) or [`TypeTransform::domain_kind`] (dump). Transforms sharing a
    /// kind, such as two record types, narrow it further.
    fn accepts(&self, direction: Direction, value: &Value) -> bool {
        let declared = match direction {
            Direction::Load => self.wire_kind(),
            Direction::Dump => self.domain_kind(),
        };
        declared == Some(value.kind())
    }

    /// Inner transforms this one delegates to.
    fn children(&self) -> Vec<TransformRef> {
        Vec::new()
    }

    /// Called once when the transform is first registered with an engine.
    fn on_register(&self, engine: &TypeEngine) {
        let _ = engine;
    }
}

/// Which halves of a transform are implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub load: bool,
    pub dump: bool,
}

impl Capabilities {
    pub const BOTH: Self = Self {
        load: true,
        dump: true,
    };
    pub const LOAD_ONLY: Self = Self {
        load: true,
        dump: false,
    };
    pub const DUMP_ONLY: Self = Self {
        load: false,
        dump: true,
    };

    pub fn supports(&self, direction: Direction) -> bool {
        match direction {
            Direction::Load => self.load,
            Direction::Dump => self.dump,
        }
    }

    /// The first direction that is not supported, if any.
    pub fn missing(&self) -> Option<Direction> {
        if !self.load {
            Some(Direction::Load)
        } else if !self.dump {
            Some(Direction::Dump)
        } else {
            None
        }
    }
}

/// Dispatch identity of a transform: the address of its shared allocation.
///
/// Two transforms with identical configuration are still distinct targets
/// unless registered as equivalent. The engine keeps every registered handle
/// alive, so an id cannot be reused while it is in a registry or cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformId(usize);

impl TransformId {
    #[must_use]
    pub fn of(transform: &TransformRef) -> Self {
        Self(Arc::as_ptr(transform).cast::<()>() as usize)
    }
}

/// Returns values unchanged in both directions.
///
/// The default transform for fields declared without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Passthrough {
    /// A fresh shared handle. Each call is a distinct dispatch target.
    #[must_use]
    pub fn shared() -> TransformRef {
        Arc::new(Passthrough)
    }
}

impl TypeTransform for Passthrough {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Passthrough")
    }

    fn load(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }

    fn dump(&self, _engine: &TypeEngine, value: &Value, _cx: &mut Context) -> Result<Value> {
        Ok(value.clone())
    }
}
