mod common;

use common::{block_type, ints, position};
use declare_engine::{
    Context, EngineConfig, ErrorKind, TransformRef, TypeEngine, TypeTransform, Value, ValueKind,
};
use declare_transforms::{Base64Bytes, Delimited, Lookup, PRECISION_KEY, Precision, Sequence};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

fn engine_with(transforms: &[&TransformRef]) -> Arc<TypeEngine> {
    let engine = TypeEngine::unique();
    for transform in transforms {
        engine.register(transform).unwrap();
    }
    engine
}

// ── Lookup ──────────────────────────────────────────────────────

#[test]
fn lookup_maps_both_ways() {
    let blocks = block_type();
    let engine = engine_with(&[&blocks]);
    let mut cx = Context::new();

    assert_eq!(
        engine.load(&blocks, &Value::from(1), &mut cx).unwrap(),
        Value::from("Stone")
    );
    assert_eq!(
        engine.dump(&blocks, &Value::from("Diamond"), &mut cx).unwrap(),
        Value::from(2)
    );
}

#[test]
fn lookup_rejects_values_outside_the_table() {
    let blocks = block_type();
    let engine = engine_with(&[&blocks]);
    let mut cx = Context::new();

    let err = engine.load(&blocks, &Value::from(7), &mut cx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(
        err.to_string(),
        "BlockType cannot convert value: no entry for 7"
    );

    let err = engine.dump(&blocks, &Value::from("Obsidian"), &mut cx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
}

#[test]
fn lookup_kinds_follow_its_entries() {
    let uniform = Lookup::new("Flags", [(0, "off"), (1, "on")]);
    let mixed = Lookup::new(
        "Mixed",
        [
            (Value::from(0), Value::from("zero")),
            (Value::from("one"), Value::from(1)),
        ],
    );

    assert_eq!(uniform.wire_kind(), Some(ValueKind::Int));
    assert_eq!(uniform.domain_kind(), Some(ValueKind::Str));
    assert_eq!(mixed.wire_kind(), None);
    assert_eq!(mixed.domain_kind(), None);
    assert_eq!(uniform.len(), 2);
}

// ── Delimited ───────────────────────────────────────────────────

#[test]
fn delimited_splits_and_joins() {
    let pos = position();
    let engine = engine_with(&[&pos]);
    let mut cx = Context::new();

    assert_eq!(
        engine.load(&pos, &Value::from("1:2:3"), &mut cx).unwrap(),
        ints(&[1, 2, 3])
    );
    assert_eq!(
        engine.dump(&pos, &ints(&[0, 64, 0]), &mut cx).unwrap(),
        Value::from("0:64:0")
    );
}

#[test]
fn delimited_enforces_arity_both_ways() {
    let pos = position();
    let engine = engine_with(&[&pos]);
    let mut cx = Context::new();

    assert!(engine.load(&pos, &Value::from("1:2"), &mut cx).is_err());
    assert!(engine.dump(&pos, &ints(&[1, 2, 3, 4]), &mut cx).is_err());
}

#[test]
fn delimited_rejects_non_integers() {
    let pos = position();
    let engine = engine_with(&[&pos]);
    let mut cx = Context::new();

    let err = engine.load(&pos, &Value::from("1:x:3"), &mut cx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert!(engine.load(&pos, &Value::from(5), &mut cx).is_err());
}

#[test]
fn delimited_without_arity_accepts_any_length() {
    let list: TransformRef = Arc::new(Delimited::new(", "));
    let engine = engine_with(&[&list]);
    let mut cx = Context::new();

    assert_eq!(
        engine.load(&list, &Value::from(""), &mut cx).unwrap(),
        ints(&[])
    );
    assert_eq!(
        engine.load(&list, &Value::from("4, 5, 6, 7"), &mut cx).unwrap(),
        ints(&[4, 5, 6, 7])
    );
}

// ── Sequence ────────────────────────────────────────────────────

#[test]
fn sequence_registers_its_inner_transform() {
    let blocks = block_type();
    let seq = Sequence::of(Arc::clone(&blocks));
    let engine = engine_with(&[&seq]);

    assert!(engine.contains(&seq));
    assert!(engine.contains(&blocks));
    assert_eq!(seq.name(), "Sequence<BlockType>");
}

#[test]
fn sequence_failure_names_the_element() {
    let seq = Sequence::of(block_type());
    let engine = engine_with(&[&seq]);
    let mut cx = Context::new();

    let err = engine.load(&seq, &ints(&[0, 1, 9]), &mut cx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composition);
    assert_eq!(
        err.to_string(),
        "Sequence<BlockType> failed at [2]: BlockType cannot convert value: no entry for 9"
    );
}

#[test]
fn sequence_rejects_non_sequences() {
    let seq = Sequence::of(block_type());
    let engine = engine_with(&[&seq]);
    let mut cx = Context::new();

    let err = engine.load(&seq, &Value::from(1), &mut cx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
}

#[test]
fn nested_sequences_report_the_full_path() {
    let grid = Sequence::of(Sequence::of(block_type()));
    let engine = engine_with(&[&grid]);
    let mut cx = Context::new();

    let wire = Value::Seq(vec![ints(&[0, 1]), ints(&[2, 5])]);
    let err = engine.load(&grid, &wire, &mut cx).unwrap_err();
    let path: Vec<String> = err.path().iter().map(ToString::to_string).collect();
    assert_eq!(path, vec!["[1]", "[1]"]);
}

// ── Base64Bytes ─────────────────────────────────────────────────

#[test]
fn base64_encodes_bytes() {
    let b64: TransformRef = Arc::new(Base64Bytes);
    let engine = engine_with(&[&b64]);
    let mut cx = Context::new();

    let wire = engine.dump(&b64, &Value::bytes(b"hello".to_vec()), &mut cx).unwrap();
    assert_eq!(wire, Value::from("aGVsbG8="));
    assert_eq!(
        engine.load(&b64, &wire, &mut cx).unwrap(),
        Value::bytes(b"hello".to_vec())
    );
}

#[test]
fn base64_rejects_malformed_text() {
    let b64: TransformRef = Arc::new(Base64Bytes);
    let engine = engine_with(&[&b64]);
    let mut cx = Context::new();

    let err = engine.load(&b64, &Value::from("not base64!"), &mut cx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
}

// ── Precision ───────────────────────────────────────────────────

#[test]
fn precision_rounds_to_the_engine_setting() {
    let precise: TransformRef = Arc::new(Precision);
    let coarse = TypeEngine::builder("coarse")
        .config(EngineConfig::new().with(PRECISION_KEY, 2))
        .build();
    let exact = TypeEngine::new("exact");
    coarse.register(&precise).unwrap();
    exact.register(&precise).unwrap();
    let mut cx = Context::new();

    let pi = Value::Float(3.14159);
    assert_eq!(coarse.dump(&precise, &pi, &mut cx).unwrap(), Value::Float(3.14));
    assert_eq!(exact.dump(&precise, &pi, &mut cx).unwrap(), pi);
    // Load is never rounded.
    assert_eq!(coarse.load(&precise, &pi, &mut cx).unwrap(), pi);
}

#[test]
fn precision_widens_integers() {
    let precise: TransformRef = Arc::new(Precision);
    let engine = engine_with(&[&precise]);
    let mut cx = Context::new();

    assert_eq!(
        engine.load(&precise, &Value::from(3), &mut cx).unwrap(),
        Value::Float(3.0)
    );
}

// ── Round trips ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn delimited_round_trips(items in prop::collection::vec(any::<i64>(), 1..16)) {
        let list: TransformRef = Arc::new(Delimited::new(":"));
        let engine = engine_with(&[&list]);
        let mut cx = Context::new();

        let domain: Value = items.iter().map(|&i| Value::Int(i)).collect();
        let wire = engine.dump(&list, &domain, &mut cx).unwrap();
        prop_assert_eq!(engine.load(&list, &wire, &mut cx).unwrap(), domain);
    }

    #[test]
    fn base64_round_trips(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let b64: TransformRef = Arc::new(Base64Bytes);
        let engine = engine_with(&[&b64]);
        let mut cx = Context::new();

        let domain = Value::bytes(bytes);
        let wire = engine.dump(&b64, &domain, &mut cx).unwrap();
        prop_assert_eq!(engine.load(&b64, &wire, &mut cx).unwrap(), domain);
    }
}
