//! The navigation core: one recursive evaluator over (subject, path, mode).
//!
//! Context is ordinary data. `Mode::Unit` means the subject is one value;
//! `Mode::Collection` means the subject is a collection of values reached by
//! an iterate segment, and key steps fan out across its elements. Every
//! transition between the two is decided by the segment at the head of the
//! path, so the whole state machine is the `match` in [`eval`].
//!
//! Null subjects flow through key steps untouched, which is what makes a
//! navigation total over missing data: absence collapses to null at the
//! fetch and then rides along to the end of the path.

use crate::error::{NavError, NavErrorKind};
use crate::index::index;
use crate::ops::{OpRegistry, default_registry};
use crate::path::{Key, OpCall, OpScope, Segment};
use crate::unbox::{entry_collection, unbox_one};
use crate::value::Value;

/// Evaluation context: whether the subject is one value or a fanned-out
/// collection of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Unit,
    Collection,
}

/// Navigates `subject` along `path` with the builtin operations.
pub fn navigate(subject: impl Into<Value>, path: &[Segment]) -> Result<Value, NavError> {
    eval(default_registry(), subject.into(), path, Mode::Unit, "$")
}

/// Navigates with a caller-supplied operation registry.
pub fn navigate_with(
    registry: &OpRegistry,
    subject: impl Into<Value>,
    path: &[Segment],
) -> Result<Value, NavError> {
    eval(registry, subject.into(), path, Mode::Unit, "$")
}

pub(crate) fn eval(
    reg: &OpRegistry,
    subject: Value,
    path: &[Segment],
    mode: Mode,
    trail: &str,
) -> Result<Value, NavError> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(subject);
    };
    let trail = head.extend_trail(trail);
    match (mode, head) {
        // Unit context: one subject, one value per step.
        (Mode::Unit, Segment::Key(key)) | (Mode::Unit, Segment::Quote(key)) => {
            let next = index(&subject, key).map_err(|e| e.at(&trail))?;
            eval(reg, next, rest, Mode::Unit, &trail)
        }
        (Mode::Unit, Segment::Iterate) => {
            eval(reg, entry_collection(subject), rest, Mode::Collection, &trail)
        }
        (Mode::Unit, Segment::Rebox) => {
            eval(reg, Value::Seq(vec![subject]), rest, Mode::Unit, &trail)
        }
        (Mode::Unit, Segment::Invoke(call)) => match call.scope {
            OpScope::Subject => {
                let next = reg.apply(&subject, call).map_err(|e| e.at(&trail))?;
                eval(reg, next, rest, Mode::Unit, &trail)
            }
            OpScope::Stream => Err(NavError::new(
                NavErrorKind::InvalidStreamScope,
                format!(
                    "stream operation {:?} is not applicable outside collection context",
                    call.name
                ),
            )
            .with_trail(trail)),
        },

        // Collection context: the subject is the whole fanned-out collection.
        (Mode::Collection, Segment::Key(key)) | (Mode::Collection, Segment::Quote(key)) => {
            let next = map_key(subject, key, &trail)?;
            eval(reg, next, rest, Mode::Collection, &trail)
        }
        (Mode::Collection, Segment::Iterate) => {
            let next = iterate_collection(subject).map_err(|e| e.at(&trail))?;
            eval(reg, next, rest, Mode::Collection, &trail)
        }
        // The fanned-out collection becomes one boxed value again.
        (Mode::Collection, Segment::Rebox) => eval(reg, subject, rest, Mode::Unit, &trail),
        (Mode::Collection, Segment::Invoke(call)) => match call.scope {
            OpScope::Stream => {
                let result = reg.apply(&subject, call).map_err(|e| e.at(&trail))?;
                eval(reg, promote(result), rest, Mode::Collection, &trail)
            }
            OpScope::Subject => {
                let next = map_invoke(reg, subject, call, &trail)?;
                eval(reg, next, rest, Mode::Collection, &trail)
            }
        },
    }
}

/// One more fan-out level: every element spreads one level deep. Strict
/// collections spread eagerly (draining any lazy elements); a lazy
/// collection stays lazy end to end.
fn iterate_collection(subjects: Value) -> Result<Value, NavError> {
    match subjects {
        Value::Lazy(lazy) => Ok(Value::Lazy(lazy.flat_map_values(unbox_one))),
        Value::Seq(items) => {
            let mut out = Vec::new();
            for item in items {
                for child in unbox_one(item) {
                    out.push(child?);
                }
            }
            Ok(Value::Seq(out))
        }
        other => Ok(Value::Seq(unbox_one(other).collect::<Result<_, _>>()?)),
    }
}

/// Applies one key step to every element, preserving positions. Null
/// elements pass through as null.
fn map_key(subjects: Value, key: &Key, trail: &str) -> Result<Value, NavError> {
    match subjects {
        Value::Seq(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in &items {
                out.push(index(item, key).map_err(|e| e.at(trail))?);
            }
            Ok(Value::Seq(out))
        }
        Value::Lazy(lazy) => {
            let key = key.clone();
            let trail = trail.to_string();
            Ok(Value::Lazy(lazy.map_values(move |v| {
                index(&v, &key).map_err(|e| e.at(&trail))
            })))
        }
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("cannot map a key step across {}", other.kind()),
        )
        .with_trail(trail)),
    }
}

/// Applies a subject-scoped operation to every element.
fn map_invoke(
    reg: &OpRegistry,
    subjects: Value,
    call: &OpCall,
    trail: &str,
) -> Result<Value, NavError> {
    match subjects {
        Value::Seq(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in &items {
                out.push(reg.apply(item, call).map_err(|e| e.at(trail))?);
            }
            Ok(Value::Seq(out))
        }
        Value::Lazy(lazy) => {
            let reg = reg.clone();
            let call = call.clone();
            let trail = trail.to_string();
            Ok(Value::Lazy(lazy.map_values(move |v| {
                reg.apply(&v, &call).map_err(|e| e.at(&trail))
            })))
        }
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("cannot map an operation across {}", other.kind()),
        )
        .with_trail(trail)),
    }
}

/// A stream operation may collapse the collection to a scalar; the result
/// stays in collection context, so a non-collection value is promoted to a
/// one-element collection.
fn promote(value: Value) -> Value {
    match value {
        collection @ (Value::Seq(_) | Value::Lazy(_)) => collection,
        other => Value::Seq(vec![other]),
    }
}

// =====================
// Tests
// =====================
