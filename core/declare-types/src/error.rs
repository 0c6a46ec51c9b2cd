//! Error types shared by the engine, schemas and records.

use crate::ValueKind;
use std::fmt;
use thiserror::Error;

/// Which half of a transform is being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Wire value -> domain value.
    Load,
    /// Domain value -> wire value.
    Dump,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Load => f.write_str("load"),
            Direction::Dump => f.write_str("dump"),
        }
    }
}

/// Where inside a composite value a nested failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Element position inside a sequence.
    Index(usize),
    /// Declared field of a record.
    Field(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Index(i) => write!(f, "[{i}]"),
            Location::Field(name) => write!(f, "`{name}`"),
        }
    }
}

/// Coarse classification of a [`DeclareError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No transform (or no value for a field) could be resolved.
    Resolution,
    /// A schema or engine was declared incorrectly. Raised at build/register time.
    Configuration,
    /// An inner transform failed while a wrapper was processing its elements.
    Composition,
    /// A transform rejected the value it was handed.
    Conversion,
}

/// Errors that can occur while declaring schemas or transforming values.
#[derive(Debug, Error)]
pub enum DeclareError {
    /// The transform was never registered with the engine it is used through.
    #[error("transform `{transform}` is not registered with engine `{engine}`")]
    Unregistered { transform: String, engine: String },

    /// Dynamic dispatch found nothing able to handle the value's shape.
    #[error("no transform can {direction} a {kind} value in engine `{engine}`")]
    NoDynamicMatch {
        direction: Direction,
        kind: ValueKind,
        engine: String,
    },

    /// A declared field has no value and no default.
    #[error("record `{schema}` has no value for field `{field}`")]
    MissingField { schema: String, field: String },

    /// A record was accessed by a name its schema does not declare.
    #[error("record `{schema}` declares no field `{field}`")]
    UnknownField { schema: String, field: String },

    /// A transform does not implement one of load/dump.
    #[error("transform `{transform}` does not support {direction}")]
    MissingCapability {
        transform: String,
        direction: Direction,
    },

    /// The same field name was declared twice in one declaration body.
    #[error("field `{field}` is declared more than once in `{schema}`")]
    DuplicateField { schema: String, field: String },

    /// The engine's compatibility filter rejected the transform.
    #[error("transform `{transform}` is incompatible with engine `{engine}`")]
    Incompatible { transform: String, engine: String },

    /// An element or field of a composite value failed.
    #[error("{transform} failed at {at}: {source}")]
    Composition {
        transform: String,
        at: Location,
        #[source]
        source: Box<DeclareError>,
    },

    /// A transform could not convert the value it received.
    #[error("{transform} cannot convert value: {reason}")]
    Conversion { transform: String, reason: String },

    /// Serialization/deserialization error from a wire format.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeclareError {
    /// Shorthand for a [`DeclareError::Conversion`].
    pub fn conversion(transform: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conversion {
            transform: transform.into(),
            reason: reason.into(),
        }
    }

    /// Wraps `self` as the failure of one element of a composite value.
    pub fn within(self, transform: impl Into<String>, at: Location) -> Self {
        Self::Composition {
            transform: transform.into(),
            at,
            source: Box::new(self),
        }
    }

    /// Maps the error onto the coarse taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unregistered { .. }
            | Self::NoDynamicMatch { .. }
            | Self::MissingField { .. }
            | Self::UnknownField { .. } => ErrorKind::Resolution,
            Self::MissingCapability { .. }
            | Self::DuplicateField { .. }
            | Self::Incompatible { .. } => ErrorKind::Configuration,
            Self::Composition { .. } => ErrorKind::Composition,
            Self::Conversion { .. } | Self::Serialization(_) => ErrorKind::Conversion,
        }
    }

    /// Follows nested composition failures down to the error that started them.
    pub fn root_cause(&self) -> &DeclareError {
        let mut current = self;
        while let Self::Composition { source, .. } = current {
            current = source;
        }
        current
    }

    /// The chain of locations from the outermost composite to the failing element.
    pub fn path(&self) -> Vec<&Location> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::Composition { at, source, .. } = current {
            path.push(at);
            current = source;
        }
        path
    }
}
