//! Per-kind indexing through full navigations: character addressing on
//! strings, bit addressing on integers, spans everywhere they make sense,
//! and closed tuples that swallow absences but reject spans.

use serde_json::json;
use spelunk::{NavErrorKind, Segment, Span, TupleValue, Value, navigate};

#[test]
fn strings_address_characters() {
    let subject = json!(["abcd", "1234", "xyzw"]);
    let found = navigate(subject, &[Segment::Iterate, 1.into()]).unwrap();
    assert_eq!(found, json!(["b", "2", "y"]));
}

#[test]
fn string_spans_take_substrings() {
    let subject = json!(["abcd", "1234", "xyzw"]);
    let found = navigate(subject, &[Segment::Iterate, (1..=2).into()]).unwrap();
    assert_eq!(found, json!(["bc", "23", "yz"]));
}

#[test]
fn string_span_edges_match_slice_rules() {
    assert_eq!(navigate(json!("abc"), &[(3..).into()]).unwrap(), json!(""));
    assert_eq!(
        navigate(json!("abc"), &[(4..).into()]).unwrap(),
        Value::Null
    );
    assert_eq!(
        navigate(json!("abc"), &[(0..2).into()]).unwrap(),
        json!("ab")
    );
}

#[test]
fn integers_address_bits() {
    assert_eq!(navigate(json!(1), &[0.into()]).unwrap(), json!(1));
    assert_eq!(navigate(json!(1), &[1.into()]).unwrap(), json!(0));
    assert_eq!(navigate(json!(0b1010), &[3.into()]).unwrap(), json!(1));
}

#[test]
fn bit_spans_extract_fields() {
    let subject = json!([0xabcd, 0x1234]);
    let found = navigate(
        subject,
        &[Segment::Iterate, Span::from(8..16).into()],
    )
    .unwrap();
    assert_eq!(found, json!([0xab, 0x12]));
}

#[test]
fn endless_bit_spans_shift_down() {
    assert_eq!(
        navigate(json!(0xabcd), &[(8..).into()]).unwrap(),
        json!(0xab)
    );
}

#[test]
fn negative_bit_span_start_is_a_range_error() {
    let err = navigate(json!(0xff), &[(-4i64..).into()]).unwrap_err();
    assert_eq!(err.kind, NavErrorKind::InvalidRange);
}

#[test]
fn sequence_spans_through_paths() {
    let subject = json!({"letters": ["a", "b", "c", "d"]});
    assert_eq!(
        navigate(subject.clone(), &["letters".into(), (1..3).into()]).unwrap(),
        json!(["b", "c"])
    );
    assert_eq!(
        navigate(subject.clone(), &["letters".into(), (-2i64..).into()]).unwrap(),
        json!(["c", "d"])
    );
    assert_eq!(
        navigate(subject, &["letters".into(), (8..).into()]).unwrap(),
        Value::Null
    );
}

#[test]
fn tuples_swallow_unknown_fields_but_reject_spans() {
    let point = TupleValue::new([("x", 3), ("y", 4)]);
    let subject = Value::from(point);
    assert_eq!(navigate(subject.clone(), &["x".into()]).unwrap(), json!(3));
    assert_eq!(navigate(subject.clone(), &[1.into()]).unwrap(), json!(4));
    assert_eq!(
        navigate(subject.clone(), &["z".into()]).unwrap(),
        Value::Null
    );
    assert_eq!(
        navigate(subject.clone(), &[(-1i64).into()]).unwrap(),
        json!(4)
    );
    let err = navigate(subject, &[(0..1).into()]).unwrap_err();
    assert_eq!(err.kind, NavErrorKind::TypeMismatch);
}

#[test]
fn nested_tuples_navigate_by_mixed_keys() {
    let inner = TupleValue::new([("lat", 10.5), ("lon", -3.25)]);
    let outer = TupleValue::new([("name", Value::from("here")), ("pos", Value::from(inner))]);
    let found = navigate(Value::from(outer), &["pos".into(), "lon".into()]).unwrap();
    assert_eq!(found, json!(-3.25));
}

#[test]
fn name_keys_against_positional_subjects_mismatch() {
    let err = navigate(json!([1, 2]), &["first".into()]).unwrap_err();
    assert_eq!(err.kind, NavErrorKind::TypeMismatch);

    let err = navigate(json!({"n": 6}), &["n".into(), "bits".into()]).unwrap_err();
    assert_eq!(err.kind, NavErrorKind::TypeMismatch);
    assert_eq!(err.trail.as_deref(), Some("$.n.bits"));
}

#[test]
fn record_positional_keys_are_ordinary_misses() {
    assert_eq!(
        navigate(json!({"a": 1}), &[0.into()]).unwrap(),
        Value::Null
    );
    assert_eq!(
        navigate(json!({"a": 1}), &[(0..2).into()]).unwrap(),
        Value::Null
    );
}
