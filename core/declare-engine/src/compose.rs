//! Element-wise helpers for wrapper transforms.
//!
//! A wrapper applies its inner transform to each element exactly once, in
//! index order, and stops at the first failure. The failure comes back as a
//! [`DeclareError::Composition`] naming the wrapper and the element; nothing
//! that was already converted is returned.

use crate::{TransformRef, TypeEngine};
use declare_types::{Context, DeclareError, Direction, Location, Result, Value};

/// Applies `inner` to every item in `direction`.
///
/// `owner` names the wrapper in the error if an element fails.
pub fn apply_each(
    engine: &TypeEngine,
    direction: Direction,
    owner: &str,
    inner: &TransformRef,
    items: &[Value],
    cx: &mut Context,
) -> Result<Vec<Value>> {
    // Resolve once; every element goes through the same strategy.
    let strategy = engine.resolve(inner)?;
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let converted = strategy
            .apply(direction, engine, item, cx)
            .map_err(|e| e.within(owner, Location::Index(index)))?;
        out.push(converted);
    }
    Ok(out)
}

/// [`apply_each`] in the load direction.
pub fn load_each(
    engine: &TypeEngine,
    owner: &str,
    inner: &TransformRef,
    items: &[Value],
    cx: &mut Context,
) -> Result<Vec<Value>> {
    apply_each(engine, Direction::Load, owner, inner, items, cx)
}

/// [`apply_each`] in the dump direction.
pub fn dump_each(
    engine: &TypeEngine,
    owner: &str,
    inner: &TransformRef,
    items: &[Value],
    cx: &mut Context,
) -> Result<Vec<Value>> {
    apply_each(engine, Direction::Dump, owner, inner, items, cx)
}

/// Wraps a failure on one named part of a composite value.
pub fn at_field<'a>(owner: &'a str, field: &'a str) -> impl FnOnce(DeclareError) -> DeclareError + 'a {
    move |e| e.within(owner, Location::Field(field.to_string()))
}
