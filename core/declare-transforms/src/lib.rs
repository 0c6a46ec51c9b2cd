//! Ready-made transforms for common wire encodings.
//!
//! These are ordinary consumers of `declare-engine`; nothing in the engine or
//! the model depends on them.
//!
//! - [`Lookup`]: fixed wire <-> domain table (enum-style codes)
//! - [`Delimited`]: integers joined by a separator (`"1:2:3"`)
//! - [`Sequence`]: ordered collection of an inner transform
//! - [`Base64Bytes`]: bytes carried as base64 text
//! - [`Precision`]: floats rounded on dump to the engine's configured precision

mod bytes;
mod delimited;
mod lookup;
mod precision;
mod sequence;

pub use bytes::Base64Bytes;
pub use delimited::Delimited;
pub use lookup::Lookup;
pub use precision::{PRECISION_KEY, Precision};
pub use sequence::Sequence;
