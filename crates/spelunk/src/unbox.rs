//! Unboxing: spreading one value into the elements it contains.
//!
//! Record-like subjects spread into their field values, sequence-like
//! subjects into their elements, and everything else stays whole as a
//! one-element stream. Strings are atoms here; they never spread into
//! characters.

use crate::lazy::LazyItems;
use crate::value::Value;

/// Spreads one owned value into a stream of elements.
pub fn unbox_one(value: Value) -> LazyItems {
    match value {
        Value::Seq(items) => Box::new(items.into_iter().map(Ok)),
        Value::Map(fields) => Box::new(fields.into_values().map(Ok)),
        Value::Tuple(tuple) => Box::new(tuple.into_values().map(Ok)),
        Value::Lazy(lazy) => lazy.items(),
        atom => Box::new(std::iter::once(Ok(atom))),
    }
}

/// Turns a unit subject into the collection entered by an iterate step:
/// records become their field values, sequences and lazy sequences pass
/// through, and an atom becomes a one-element sequence.
pub(crate) fn entry_collection(subject: Value) -> Value {
    match subject {
        Value::Map(fields) => Value::Seq(fields.into_values().collect()),
        Value::Tuple(tuple) => Value::Seq(tuple.into_values().collect()),
        collection @ (Value::Seq(_) | Value::Lazy(_)) => collection,
        atom => Value::Seq(vec![atom]),
    }
}

/// The element view of any subject: field values of a record, elements of a
/// sequence, or the value itself boxed into a one-element sequence.
pub fn values(subject: impl Into<Value>) -> Value {
    entry_collection(subject.into())
}

#[cfg(test)]
mod unbox_tests {
    use super::*;
    use crate::value::TupleValue;
    use serde_json::json;

    #[test]
    fn records_spread_into_field_values() {
        assert_eq!(values(json!({"a": 1, "b": 2})), json!([1, 2]));
    }

    #[test]
    fn sequences_pass_through() {
        assert_eq!(values(json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn atoms_box_into_one_element() {
        assert_eq!(values(json!("abc")), json!(["abc"]));
        assert_eq!(values(5i64), json!([5]));
        assert_eq!(values(Value::Null), json!([null]));
    }

    #[test]
    fn tuples_spread_like_records() {
        let point = TupleValue::new([("x", 1), ("y", 2)]);
        assert_eq!(values(Value::from(point)), json!([1, 2]));
    }

    #[test]
    fn unbox_keeps_nested_structure_one_level_deep() {
        let spread: Vec<Value> = unbox_one(Value::from(json!([[1, 2], 3])))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(spread, vec![Value::from(json!([1, 2])), Value::Int(3)]);
    }
}
