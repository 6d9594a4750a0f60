//! Indexing: fetch one key out of one subject.
//!
//! Each subject kind gets its own adapter implementing [`Fetch`]; there is no
//! runtime type probing anywhere else. Adapters report raw [`FetchError`]s
//! and [`index`] applies the tolerance policy on top: absence collapses to
//! null, everything else propagates. Bools and floats have no indexing
//! capability at all, so any key against them is a mismatch.

use indexmap::IndexMap;

use crate::error::{NavError, NavErrorKind};
use crate::lazy::LazySeq;
use crate::path::{Key, Span};
use crate::value::{TupleValue, Value};

/// Raw outcome of a fetch, before the tolerance policy runs.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// A closed-shape subject has no field or position for this key.
    /// Swallowed into null by the policy.
    Absent(String),
    /// The subject cannot honor this key kind. Always propagates.
    Mismatch(String),
    /// Bounds the subject cannot honor. Always propagates.
    Range(String),
    /// An error deferred inside a lazy element, surfaced by forcing it here.
    /// Passes through untouched, keeping its original trail.
    Deferred(NavError),
}

pub trait Fetch {
    fn fetch(&self, key: &Key) -> Result<Value, FetchError>;
}

/// Open record: a miss of any kind is an ordinary miss, never an error.
pub struct RecordIndex<'a>(pub &'a IndexMap<String, Value>);

/// Positional sequence with negative-from-the-end indexing and slicing.
pub struct SeqIndex<'a>(pub &'a [Value]);

/// Closed record: unknown fields and positions are absences.
pub struct TupleIndex<'a>(pub &'a TupleValue);

/// Character-positional view of a string.
pub struct TextIndex<'a>(pub &'a str);

/// Bit-addressed view of an integer.
pub struct BitsIndex(pub i64);

/// Forcing view of a lazy sequence; spans stay lazy.
pub struct LazyIndex<'a>(pub &'a LazySeq);

/// Fetches `key` from `subject` with the tolerance policy applied: a null
/// subject yields null without looking at the key, absence yields null, and
/// mismatches, bad ranges, and deferred errors become navigation errors.
pub fn index(subject: &Value, key: &Key) -> Result<Value, NavError> {
    let fetched = match subject {
        Value::Null => return Ok(Value::Null),
        Value::Map(fields) => RecordIndex(fields).fetch(key),
        Value::Seq(items) => SeqIndex(items).fetch(key),
        Value::Tuple(tuple) => TupleIndex(tuple).fetch(key),
        Value::Str(text) => TextIndex(text).fetch(key),
        Value::Int(n) => BitsIndex(*n).fetch(key),
        Value::Lazy(lazy) => LazyIndex(lazy).fetch(key),
        other => Err(FetchError::Mismatch(format!(
            "cannot index a {} subject",
            other.kind()
        ))),
    };
    match fetched {
        Ok(value) => Ok(value),
        Err(FetchError::Absent(_)) => Ok(Value::Null),
        Err(FetchError::Mismatch(message)) => {
            Err(NavError::new(NavErrorKind::TypeMismatch, message))
        }
        Err(FetchError::Range(message)) => Err(NavError::new(NavErrorKind::InvalidRange, message)),
        Err(FetchError::Deferred(err)) => Err(err),
    }
}

impl Fetch for RecordIndex<'_> {
    fn fetch(&self, key: &Key) -> Result<Value, FetchError> {
        match key {
            Key::Name(name) => Ok(self.0.get(name).cloned().unwrap_or(Value::Null)),
            // Records are open: position-shaped keys simply miss.
            Key::Index(_) | Key::Span(_) => Ok(Value::Null),
        }
    }
}

impl Fetch for SeqIndex<'_> {
    fn fetch(&self, key: &Key) -> Result<Value, FetchError> {
        let items = self.0;
        match key {
            Key::Name(name) => Err(FetchError::Mismatch(format!(
                "cannot index a sequence by name {:?}",
                name
            ))),
            Key::Index(index) => {
                let len = items.len() as i64;
                let at = if *index < 0 { index + len } else { *index };
                if at < 0 || at >= len {
                    Ok(Value::Null)
                } else {
                    Ok(items[at as usize].clone())
                }
            }
            Key::Span(span) => match slice_bounds(items.len() as i64, span) {
                Some((from, to)) => Ok(Value::Seq(items[from..to].to_vec())),
                None => Ok(Value::Null),
            },
        }
    }
}

impl Fetch for TupleIndex<'_> {
    fn fetch(&self, key: &Key) -> Result<Value, FetchError> {
        let tuple = self.0;
        match key {
            Key::Name(name) => match tuple.field(name) {
                Some(value) => Ok(value.clone()),
                None => Err(FetchError::Absent(format!(
                    "tuple has no field {:?}",
                    name
                ))),
            },
            Key::Index(index) => {
                let len = tuple.len() as i64;
                let at = if *index < 0 { index + len } else { *index };
                if at < 0 || at >= len {
                    Err(FetchError::Absent(format!(
                        "tuple has no position {}",
                        index
                    )))
                } else {
                    Ok(tuple.position(at as usize).cloned().unwrap_or(Value::Null))
                }
            }
            Key::Span(_) => Err(FetchError::Mismatch(
                "cannot take a span of a tuple".to_string(),
            )),
        }
    }
}

impl Fetch for TextIndex<'_> {
    fn fetch(&self, key: &Key) -> Result<Value, FetchError> {
        let text = self.0;
        match key {
            Key::Name(name) => Err(FetchError::Mismatch(format!(
                "cannot index a string by name {:?}",
                name
            ))),
            Key::Index(index) => {
                let len = text.chars().count() as i64;
                let at = if *index < 0 { index + len } else { *index };
                if at < 0 || at >= len {
                    Ok(Value::Null)
                } else {
                    Ok(text
                        .chars()
                        .nth(at as usize)
                        .map(Value::from)
                        .unwrap_or(Value::Null))
                }
            }
            Key::Span(span) => {
                let len = text.chars().count() as i64;
                match slice_bounds(len, span) {
                    Some((from, to)) => Ok(Value::Str(
                        text.chars().skip(from).take(to - from).collect(),
                    )),
                    None => Ok(Value::Null),
                }
            }
        }
    }
}

impl Fetch for BitsIndex {
    fn fetch(&self, key: &Key) -> Result<Value, FetchError> {
        let n = self.0;
        match key {
            Key::Name(name) => Err(FetchError::Mismatch(format!(
                "cannot index an integer by name {:?}",
                name
            ))),
            // Bit at the position: negative positions read as zero, positions
            // past the top bit repeat the sign bit.
            Key::Index(index) => {
                if *index < 0 {
                    Ok(Value::Int(0))
                } else {
                    let shift = (*index).min(63) as u32;
                    Ok(Value::Int((n >> shift) & 1))
                }
            }
            Key::Span(span) => {
                let start = span.start.unwrap_or(0);
                if start < 0 {
                    return Err(FetchError::Range(format!(
                        "negative bit-slice start: {}",
                        start
                    )));
                }
                let shifted = n >> start.min(63) as u32;
                let width = match span.end {
                    None => return Ok(Value::Int(shifted)),
                    Some(end) => end - start + if span.exclusive { 0 } else { 1 },
                };
                if width <= 0 {
                    return Ok(Value::Int(0));
                }
                // Widths covering the whole word saturate to all usable bits.
                let mask = if width >= 63 {
                    i64::MAX
                } else {
                    (1i64 << width) - 1
                };
                Ok(Value::Int(shifted & mask))
            }
        }
    }
}

impl Fetch for LazyIndex<'_> {
    fn fetch(&self, key: &Key) -> Result<Value, FetchError> {
        let lazy = self.0;
        match key {
            Key::Name(name) => Err(FetchError::Mismatch(format!(
                "cannot index a lazy sequence by name {:?}",
                name
            ))),
            // Forces index + 1 elements. The sequence may be unbounded, so
            // counting from the end is impossible.
            Key::Index(index) => {
                if *index < 0 {
                    return Err(FetchError::Range(
                        "attempt to drop negative size".to_string(),
                    ));
                }
                match lazy.items().nth(*index as usize) {
                    None => Ok(Value::Null),
                    Some(Ok(value)) => Ok(value),
                    Some(Err(err)) => Err(FetchError::Deferred(err)),
                }
            }
            // A span is a window: still lazy, nothing forced here.
            Key::Span(span) => {
                let start = span.start.unwrap_or(0);
                if start < 0 {
                    return Err(FetchError::Range(
                        "attempt to drop negative size".to_string(),
                    ));
                }
                let take = match span.end {
                    None => None,
                    Some(end) if end < 0 => Some(0),
                    Some(end) => {
                        let until = end + if span.exclusive { 0 } else { 1 };
                        Some((until - start).max(0) as usize)
                    }
                };
                Ok(Value::Lazy(lazy.window(start as usize, take)))
            }
        }
    }
}

/// Normalizes a span against a bounded length: negative bounds count from
/// the end, a start just past the end is an empty slice, further out is a
/// miss (`None`), and a backwards range is empty.
fn slice_bounds(len: i64, span: &Span) -> Option<(usize, usize)> {
    let mut start = span.start.unwrap_or(0);
    if start < 0 {
        start += len;
    }
    if start < 0 || start > len {
        return None;
    }
    let until = match span.end {
        None => len,
        Some(end) => {
            let end = if end < 0 { end + len } else { end };
            let until = if span.exclusive { end } else { end + 1 };
            until.clamp(start, len)
        }
    };
    Some((start as usize, until as usize))
}

// =====================
// Tests
// =====================

#[cfg(test)]
mod index_tests {
    use super::*;
    use serde_json::json;

    fn val(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    #[test]
    fn record_misses_collapse_to_null() {
        let subject = val(json!({"a": 1}));
        assert_eq!(index(&subject, &Key::from("a")).unwrap(), json!(1));
        assert_eq!(index(&subject, &Key::from("b")).unwrap(), Value::Null);
        assert_eq!(index(&subject, &Key::from(0)).unwrap(), Value::Null);
        assert_eq!(index(&subject, &Key::from(0..2)).unwrap(), Value::Null);
    }

    #[test]
    fn null_subject_short_circuits() {
        assert_eq!(index(&Value::Null, &Key::from("anything")).unwrap(), Value::Null);
        assert_eq!(index(&Value::Null, &Key::from(3)).unwrap(), Value::Null);
    }

    #[test]
    fn sequence_positions_count_from_either_end() {
        let subject = val(json!([10, 20, 30]));
        assert_eq!(index(&subject, &Key::from(0)).unwrap(), json!(10));
        assert_eq!(index(&subject, &Key::from(-1i64)).unwrap(), json!(30));
        assert_eq!(index(&subject, &Key::from(3)).unwrap(), Value::Null);
        assert_eq!(index(&subject, &Key::from(-4i64)).unwrap(), Value::Null);
    }

    #[test]
    fn sequence_rejects_names() {
        let subject = val(json!([1, 2]));
        let err = index(&subject, &Key::from("a")).unwrap_err();
        assert_eq!(err.kind, NavErrorKind::TypeMismatch);
    }

    #[test]
    fn sequence_spans_follow_slice_rules() {
        let subject = val(json!([1, 2, 3]));
        assert_eq!(index(&subject, &Key::from(1..)).unwrap(), json!([2, 3]));
        assert_eq!(index(&subject, &Key::from(0..2)).unwrap(), json!([1, 2]));
        assert_eq!(index(&subject, &Key::from(1..=1)).unwrap(), json!([2]));
        assert_eq!(index(&subject, &Key::from(-2i64..)).unwrap(), json!([2, 3]));
        // Start exactly at the end is an empty slice; past it is a miss.
        assert_eq!(index(&subject, &Key::from(3..)).unwrap(), json!([]));
        assert_eq!(index(&subject, &Key::from(4..)).unwrap(), Value::Null);
        // Backwards and over-negative ranges are empty.
        assert_eq!(index(&subject, &Key::from(2..1)).unwrap(), json!([]));
        assert_eq!(index(&subject, &Key::from(0..-5i64)).unwrap(), json!([]));
    }

    #[test]
    fn tuple_absences_swallow_but_spans_mismatch() {
        let subject = Value::from(TupleValue::new([("x", 1), ("y", 2)]));
        assert_eq!(index(&subject, &Key::from("x")).unwrap(), json!(1));
        assert_eq!(index(&subject, &Key::from("z")).unwrap(), Value::Null);
        assert_eq!(index(&subject, &Key::from(1)).unwrap(), json!(2));
        assert_eq!(index(&subject, &Key::from(-1i64)).unwrap(), json!(2));
        assert_eq!(index(&subject, &Key::from(5)).unwrap(), Value::Null);
        let err = index(&subject, &Key::from(0..1)).unwrap_err();
        assert_eq!(err.kind, NavErrorKind::TypeMismatch);
    }

    #[test]
    fn string_indexing_is_character_based() {
        let subject = Value::from("abc");
        assert_eq!(index(&subject, &Key::from(1)).unwrap(), json!("b"));
        assert_eq!(index(&subject, &Key::from(-1i64)).unwrap(), json!("c"));
        assert_eq!(index(&subject, &Key::from(3)).unwrap(), Value::Null);
        assert_eq!(index(&subject, &Key::from(1..)).unwrap(), json!("bc"));
        assert_eq!(index(&subject, &Key::from(3..)).unwrap(), json!(""));
        assert_eq!(index(&subject, &Key::from(4..)).unwrap(), Value::Null);
        let err = index(&subject, &Key::from("len")).unwrap_err();
        assert_eq!(err.kind, NavErrorKind::TypeMismatch);
    }

    #[test]
    fn multibyte_strings_count_characters_not_bytes() {
        let subject = Value::from("héllo");
        assert_eq!(index(&subject, &Key::from(1)).unwrap(), json!("é"));
        assert_eq!(index(&subject, &Key::from(0..2)).unwrap(), json!("hé"));
    }

    #[test]
    fn integer_bits_by_position() {
        assert_eq!(index(&Value::Int(1), &Key::from(0)).unwrap(), json!(1));
        assert_eq!(index(&Value::Int(1), &Key::from(1)).unwrap(), json!(0));
        assert_eq!(index(&Value::Int(0b100), &Key::from(2)).unwrap(), json!(1));
        // Negative bit positions read as zero.
        assert_eq!(index(&Value::Int(5), &Key::from(-1i64)).unwrap(), json!(0));
        // Sign bit repeats upward for negatives.
        assert_eq!(index(&Value::Int(-1), &Key::from(70)).unwrap(), json!(1));
    }

    #[test]
    fn integer_bit_spans() {
        let subject = Value::Int(0xabcd);
        assert_eq!(index(&subject, &Key::from(8..16)).unwrap(), json!(0xab));
        assert_eq!(index(&subject, &Key::from(0..4)).unwrap(), json!(0xd));
        assert_eq!(index(&subject, &Key::from(4..=7)).unwrap(), json!(0xc));
        assert_eq!(index(&subject, &Key::from(8..)).unwrap(), json!(0xab));
        let err = index(&subject, &Key::from(-4i64..)).unwrap_err();
        assert_eq!(err.kind, NavErrorKind::InvalidRange);
    }

    #[test]
    fn bools_and_floats_have_no_indexing() {
        let err = index(&Value::Bool(true), &Key::from(0)).unwrap_err();
        assert_eq!(err.kind, NavErrorKind::TypeMismatch);
        let err = index(&Value::Float(1.5), &Key::from("a")).unwrap_err();
        assert_eq!(err.kind, NavErrorKind::TypeMismatch);
    }

    #[test]
    fn lazy_position_forces_a_prefix_only() {
        let naturals = LazySeq::new(|| (0i64..).map(Value::from));
        let subject = Value::Lazy(naturals);
        assert_eq!(index(&subject, &Key::from(10)).unwrap(), json!(10));
        let err = index(&subject, &Key::from(-1i64)).unwrap_err();
        assert_eq!(err.kind, NavErrorKind::InvalidRange);
        assert_eq!(err.message, "attempt to drop negative size");
    }

    #[test]
    fn lazy_spans_stay_lazy() {
        let naturals = LazySeq::new(|| (0i64..).map(Value::from));
        let subject = Value::Lazy(naturals);
        let window = index(&subject, &Key::from(10..=12)).unwrap();
        match window {
            Value::Lazy(lazy) => {
                assert_eq!(lazy.to_values().unwrap(), vec![
                    Value::Int(10),
                    Value::Int(11),
                    Value::Int(12)
                ]);
            }
            other => panic!("expected a lazy window, got {}", other.kind()),
        }
        // Backwards window is empty, negative start is an error.
        let empty = index(&subject, &Key::from(10..8)).unwrap();
        match empty {
            Value::Lazy(lazy) => assert_eq!(lazy.to_values().unwrap(), Vec::<Value>::new()),
            other => panic!("expected a lazy window, got {}", other.kind()),
        }
        let err = index(&subject, &Key::from(-3i64..)).unwrap_err();
        assert_eq!(err.kind, NavErrorKind::InvalidRange);
    }

    #[test]
    fn finite_lazy_past_the_end_is_null() {
        let three = LazySeq::from_values(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let subject = Value::Lazy(three);
        assert_eq!(index(&subject, &Key::from(5)).unwrap(), Value::Null);
    }
}
