//! Unit and collection context transitions across whole pipelines: iterate
//! fans out, rebox folds back, and key steps mean one fetch or a mapped
//! fetch depending on which side of an iterate they sit.

use serde_json::json;
use spelunk::{Segment, Value, navigate};

#[test]
fn key_before_iterate_fetches_once_key_after_maps() {
    let subject = json!({"rows": [[1, 2], [3, 4]]});
    let first_row = navigate(subject.clone(), &["rows".into(), 0.into()]).unwrap();
    assert_eq!(first_row, json!([1, 2]));

    let first_of_each = navigate(subject, &["rows".into(), Segment::Iterate, 0.into()]).unwrap();
    assert_eq!(first_of_each, json!([1, 3]));
}

#[test]
fn iterate_spreads_record_values_then_maps() {
    let subject = json!({"a": {"v": 1}, "b": {"v": 2}});
    let found = navigate(subject, &[Segment::Iterate, "v".into()]).unwrap();
    assert_eq!(found, json!([1, 2]));
}

#[test]
fn each_iterate_unwraps_exactly_one_level() {
    let subject = json!([1, [2], [3, [4]]]);
    assert_eq!(
        navigate(subject.clone(), &[Segment::Iterate]).unwrap(),
        json!([1, [2], [3, [4]]])
    );
    assert_eq!(
        navigate(subject.clone(), &[Segment::Iterate, Segment::Iterate]).unwrap(),
        json!([1, 2, 3, [4]])
    );
    assert_eq!(
        navigate(
            subject,
            &[Segment::Iterate, Segment::Iterate, Segment::Iterate]
        )
        .unwrap(),
        json!([1, 2, 3, 4])
    );
}

#[test]
fn strings_never_spread_into_characters() {
    let subject = json!(["abc", ["one", "two", "three"]]);
    let found = navigate(subject, &[Segment::Iterate, Segment::Iterate]).unwrap();
    assert_eq!(found, json!(["abc", "one", "two", "three"]));
}

#[test]
fn records_inside_a_collection_spread_their_values() {
    let subject = json!([{"a": 1}, {"b": 2, "c": 3}]);
    let found = navigate(subject, &[Segment::Iterate, Segment::Iterate]).unwrap();
    assert_eq!(found, json!([1, 2, 3]));
}

#[test]
fn rebox_wraps_a_unit_subject() {
    assert_eq!(
        navigate(json!({"foo": "bar"}), &[Segment::Rebox]).unwrap(),
        json!([{"foo": "bar"}])
    );
    assert_eq!(
        navigate(json!({"foo": "bar"}), &[Segment::Rebox, Segment::Rebox]).unwrap(),
        json!([[{"foo": "bar"}]])
    );
}

#[test]
fn rebox_folds_a_fan_out_back_into_one_value() {
    let subject = json!([{"foo": 1}, {"foo": 2}]);
    let found = navigate(
        subject,
        &[Segment::Iterate, "foo".into(), Segment::Rebox, 0.into()],
    )
    .unwrap();
    assert_eq!(found, json!(1));
}

#[test]
fn pipeline_across_mixed_depths() {
    let subject = json!({"a": {"b": [{"c": 1}, {"c": 2}]}});
    let found = navigate(
        subject,
        &[
            "a".into(),
            "b".into(),
            Segment::Iterate,
            "c".into(),
            Segment::Rebox,
            1.into(),
        ],
    )
    .unwrap();
    assert_eq!(found, json!(2));
}

#[test]
fn ending_in_collection_context_returns_the_collection() {
    let subject = json!([[1, 2], [3, 4]]);
    let found = navigate(subject.clone(), &[Segment::Iterate]).unwrap();
    assert_eq!(found, subject);
}

#[test]
fn atoms_entering_iteration_become_one_element_collections() {
    assert_eq!(
        navigate(json!("abc"), &[Segment::Iterate]).unwrap(),
        json!(["abc"])
    );
    assert_eq!(navigate(json!(5), &[Segment::Iterate]).unwrap(), json!([5]));
    assert_eq!(
        navigate(json!(null), &[Segment::Iterate]).unwrap(),
        json!([null])
    );
}

#[test]
fn nulls_inside_a_collection_ride_along() {
    let subject = json!([{"name": "a"}, null, {"name": "c"}]);
    let found = navigate(subject, &[Segment::Iterate, "name".into()]).unwrap();
    assert_eq!(found, json!(["a", null, "c"]));
}

#[test]
fn rebox_then_iterate_round_trips_a_collection() {
    let subject = json!([[1, 2], [3, 4]]);
    let found = navigate(
        subject.clone(),
        &[Segment::Iterate, Segment::Rebox, Segment::Iterate],
    )
    .unwrap();
    assert_eq!(found, subject);
}

#[test]
fn mixed_kinds_fan_out_under_one_key() {
    let subject = json!([[1, 2], "abc", ["foo", "bar", "baz"]]);
    let found = navigate(subject, &[Segment::Iterate, 1.into()]).unwrap();
    assert_eq!(found, json!([2, "b", "bar"]));
}

#[test]
fn deep_quote_behaves_like_its_key() {
    let subject = json!({"a": [5, 6]});
    let via_key = navigate(subject.clone(), &["a".into(), 1.into()]).unwrap();
    let via_quote = navigate(subject, &["a".into(), Segment::quote(1)]).unwrap();
    assert_eq!(via_key, via_quote);
    assert_eq!(via_quote, json!(6));
}

#[test]
fn tuples_fan_out_like_records() {
    use spelunk::TupleValue;
    let pair = Value::from(TupleValue::new([("x", 1), ("y", 2)]));
    let found = navigate(pair, &[Segment::Iterate]).unwrap();
    assert_eq!(found, json!([1, 2]));
}

#[test]
fn repeated_navigation_gives_identical_results() {
    let subject = json!({"a": [{"b": 1}, {"b": 2}]});
    let path = ["a".into(), Segment::Iterate, "b".into()];
    let first = navigate(subject.clone(), &path).unwrap();
    let second = navigate(subject, &path).unwrap();
    assert_eq!(first, second);
    assert_eq!(second, json!([1, 2]));
}
