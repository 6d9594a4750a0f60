//! Path descriptors: building a path from a JSON or YAML document.
//!
//! A descriptor is an array, one entry per segment:
//!
//! - `"name"` — key by field name
//! - `7` — key by position
//! - `{"start": 1, "end": 4, "exclusive": true}` — key by span
//! - `[]` — iterate
//! - `[[]]` — rebox
//! - `["", key]` — quote: the second entry is a key, never a marker
//! - `{"op": "select", "with": "even", "args": [...]}` — stream-scoped
//!   invocation
//! - `[{"op": "compact"}]` — subject-scoped invocation
//!
//! Quoting exists because a bare array entry always reads as a marker; a
//! key that would otherwise be spelled like one must ride inside `["", _]`.

use serde_json::Value as JsonValue;

use crate::error::{PathError, PathErrorKind};
use crate::path::{Key, OpCall, OpScope, Segment, Span};
use crate::value::Value;

/// Parses a whole descriptor document. Errors carry the zero-based position
/// of the offending segment.
pub fn path_from_json(descriptor: &JsonValue) -> Result<Vec<Segment>, PathError> {
    let JsonValue::Array(parts) = descriptor else {
        return Err(PathError::new(
            PathErrorKind::InvalidDocument,
            format!("path descriptor must be an array, got {}", json_kind(descriptor)),
        ));
    };
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| parse_segment(part).map_err(|e| e.at_segment(i)))
        .collect()
}

/// Parses a YAML document holding a descriptor array.
pub fn path_from_yaml(source: &str) -> Result<Vec<Segment>, PathError> {
    let descriptor: JsonValue = serde_yaml::from_str(source)?;
    path_from_json(&descriptor)
}

fn parse_segment(value: &JsonValue) -> Result<Segment, PathError> {
    match value {
        JsonValue::String(name) => Ok(Segment::Key(Key::Name(name.clone()))),
        JsonValue::Number(_) => Ok(Segment::Key(parse_key(value)?)),
        JsonValue::Array(parts) => parse_marker(parts),
        JsonValue::Object(obj) => {
            if obj.contains_key("op") {
                Ok(Segment::Invoke(parse_invoke(obj, OpScope::Stream)?))
            } else {
                Ok(Segment::Key(Key::Span(parse_span(obj)?)))
            }
        }
        other => Err(PathError::new(
            PathErrorKind::InvalidSegment,
            format!("segment cannot be {}", json_kind(other)),
        )),
    }
}

fn parse_marker(parts: &[JsonValue]) -> Result<Segment, PathError> {
    match parts {
        [] => Ok(Segment::Iterate),
        [JsonValue::Array(inner)] if inner.is_empty() => Ok(Segment::Rebox),
        [JsonValue::Object(obj)] if obj.contains_key("op") => {
            Ok(Segment::Invoke(parse_invoke(obj, OpScope::Subject)?))
        }
        [JsonValue::String(mark), key] if mark.is_empty() => {
            Ok(Segment::Quote(parse_key(key)?))
        }
        _ => Err(PathError::new(
            PathErrorKind::InvalidSegment,
            "unrecognized marker; expected [], [[]], [\"\", key], or [{\"op\": ...}]",
        )),
    }
}

fn parse_key(value: &JsonValue) -> Result<Key, PathError> {
    match value {
        JsonValue::String(name) => Ok(Key::Name(name.clone())),
        JsonValue::Number(n) => match n.as_i64() {
            Some(index) => Ok(Key::Index(index)),
            None => Err(PathError::new(
                PathErrorKind::InvalidKey,
                format!("index must be an integer, got {}", n),
            )),
        },
        JsonValue::Object(obj) if !obj.contains_key("op") => Ok(Key::Span(parse_span(obj)?)),
        other => Err(PathError::new(
            PathErrorKind::InvalidKey,
            format!("key cannot be {}", json_kind(other)),
        )),
    }
}

fn parse_span(obj: &serde_json::Map<String, JsonValue>) -> Result<Span, PathError> {
    for field in obj.keys() {
        if !matches!(field.as_str(), "start" | "end" | "exclusive") {
            return Err(PathError::new(
                PathErrorKind::InvalidSpan,
                format!("unknown span field {:?}", field),
            ));
        }
    }
    let start = obj.get("start").map(|v| span_bound(v, "start")).transpose()?;
    let end = obj.get("end").map(|v| span_bound(v, "end")).transpose()?;
    let exclusive = match obj.get("exclusive") {
        None => false,
        Some(JsonValue::Bool(b)) => *b,
        Some(_) => {
            return Err(PathError::new(
                PathErrorKind::InvalidSpan,
                "exclusive must be a bool",
            ));
        }
    };
    Ok(Span::new(start, end, exclusive))
}

fn span_bound(value: &JsonValue, field: &str) -> Result<i64, PathError> {
    value.as_i64().ok_or_else(|| {
        PathError::new(
            PathErrorKind::InvalidSpan,
            format!("span {} must be an integer", field),
        )
    })
}

fn parse_invoke(
    obj: &serde_json::Map<String, JsonValue>,
    scope: OpScope,
) -> Result<OpCall, PathError> {
    for field in obj.keys() {
        if !matches!(field.as_str(), "op" | "args" | "with") {
            return Err(PathError::new(
                PathErrorKind::InvalidInvocation,
                format!("unknown invocation field {:?}", field),
            ));
        }
    }
    let name = obj
        .get("op")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            PathError::new(PathErrorKind::InvalidInvocation, "op must be a string")
        })?;
    let args = match obj.get("args") {
        None => Vec::new(),
        Some(JsonValue::Array(items)) => items.iter().cloned().map(Value::from).collect(),
        Some(_) => {
            return Err(PathError::new(
                PathErrorKind::InvalidInvocation,
                "args must be an array",
            ));
        }
    };
    let with = match obj.get("with") {
        None => None,
        Some(JsonValue::String(predicate)) => Some(predicate.clone()),
        Some(_) => {
            return Err(PathError::new(
                PathErrorKind::InvalidInvocation,
                "with must be an operation name",
            ));
        }
    };
    Ok(OpCall {
        name: name.to_string(),
        args,
        with,
        scope,
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a bool",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

// =====================
// Tests
// =====================
