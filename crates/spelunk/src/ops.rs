//! The operation registry and its builtin vocabulary.
//!
//! Invocation segments resolve operation names here at evaluation time;
//! nothing outside this registry is callable from a path. Predicates are
//! ordinary registered operations referenced by name through an
//! invocation's `with` channel, so user registrations extend the predicate
//! vocabulary too.
//!
//! Registries are cheap to clone and share one operation table, which lets
//! steps stacked on a lazy sequence capture the registry they were
//! evaluated with.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::error::{NavError, NavErrorKind};
use crate::path::OpCall;
use crate::value::Value;

pub type OpFn = Arc<dyn Fn(&OpRegistry, &Value, &OpCall) -> Result<Value, NavError> + Send + Sync>;

#[derive(Clone)]
pub struct OpRegistry {
    ops: Arc<HashMap<String, OpFn>>,
}

impl OpRegistry {
    /// A registry with no operations at all.
    pub fn empty() -> Self {
        Self {
            ops: Arc::new(HashMap::new()),
        }
    }

    /// A registry preloaded with the builtin vocabulary.
    pub fn with_builtins() -> Self {
        let mut reg = Self::empty();
        register_builtins(&mut reg);
        reg
    }

    pub fn register<F>(&mut self, name: impl Into<String>, op: F)
    where
        F: Fn(&OpRegistry, &Value, &OpCall) -> Result<Value, NavError> + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.ops).insert(name.into(), Arc::new(op));
    }

    /// Registers `name` as another spelling of an existing operation.
    pub fn alias(&mut self, name: impl Into<String>, target: &str) {
        if let Some(op) = self.ops.get(target).cloned() {
            Arc::make_mut(&mut self.ops).insert(name.into(), op);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    pub fn apply(&self, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
        match self.ops.get(&call.name) {
            Some(op) => op(self, subject, call),
            None => Err(NavError::new(
                NavErrorKind::OperationNotSupported,
                format!("unknown operation {:?}", call.name),
            )),
        }
    }

    /// Runs a named operation as a predicate over one value. Null and false
    /// results reject; every other result accepts.
    pub(crate) fn apply_predicate(&self, name: &str, value: &Value) -> Result<bool, NavError> {
        let call = OpCall::subject(name);
        Ok(is_truthy(&self.apply(value, &call)?))
    }
}

/// The shared builtin registry used by the plain entry points.
pub fn default_registry() -> &'static OpRegistry {
    static DEFAULT_REGISTRY: OnceLock<OpRegistry> = OnceLock::new();
    DEFAULT_REGISTRY.get_or_init(OpRegistry::with_builtins)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        _ => true,
    }
}

// =====================
// Builtin operations
// =====================

fn register_builtins(reg: &mut OpRegistry) {
    reg.register("compact", op_compact);
    reg.register("filter", op_filter);
    reg.register("reject", op_reject);
    reg.register("first", op_first);
    reg.register("last", op_last);
    reg.register("flatten", op_flatten);
    reg.register("sort", op_sort);
    reg.register("unique", op_unique);
    reg.register("reverse", op_reverse);
    reg.register("join", op_join);
    reg.register("keys", op_keys);
    reg.register("values", op_values);
    reg.register("length", op_length);
    reg.register("sum", op_sum);
    reg.register("min", op_min);
    reg.register("max", op_max);
    reg.register("matches", op_matches);
    reg.register("to_string", op_to_string);
    reg.register("even", op_even);
    reg.register("odd", op_odd);
    reg.register("null", op_null);
    reg.register("empty", op_empty);
    reg.alias("select", "filter");
    reg.alias("size", "length");
    reg.alias("uniq", "unique");
}

// =====================
// Helpers
// =====================

fn no_args(call: &OpCall) -> Result<(), NavError> {
    if call.args.is_empty() {
        Ok(())
    } else {
        Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("{} takes no arguments", call.name),
        ))
    }
}

fn predicate_name<'a>(call: &'a OpCall) -> Result<&'a str, NavError> {
    call.with.as_deref().ok_or_else(|| {
        NavError::new(
            NavErrorKind::TypeMismatch,
            format!("{} requires a predicate name (with)", call.name),
        )
    })
}

/// Materializes a sequence-shaped subject: strict sequences clone, lazy
/// sequences drain. Anything else is a mismatch.
fn elements(subject: &Value, op: &str) -> Result<Vec<Value>, NavError> {
    match subject {
        Value::Seq(items) => Ok(items.clone()),
        Value::Lazy(lazy) => lazy.to_values(),
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("{} requires a sequence, got {}", op, other.kind()),
        )),
    }
}

fn stringify(value: &Value) -> Result<String, NavError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Lazy(_) => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            "cannot render a lazy sequence as a string",
        )),
        container => Ok(container.clone().into_json()?.to_string()),
    }
}

// =====================
// Sequence shaping
// =====================

fn op_compact(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    match subject {
        Value::Seq(items) => Ok(Value::Seq(
            items.iter().filter(|v| !v.is_null()).cloned().collect(),
        )),
        Value::Lazy(lazy) => Ok(Value::Lazy(lazy.filter_values(|v| Ok(!v.is_null())))),
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("compact requires a sequence, got {}", other.kind()),
        )),
    }
}

fn op_filter(reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    let predicate = predicate_name(call)?;
    match subject {
        Value::Seq(items) => {
            let mut kept = Vec::new();
            for item in items {
                if reg.apply_predicate(predicate, item)? {
                    kept.push(item.clone());
                }
            }
            Ok(Value::Seq(kept))
        }
        Value::Lazy(lazy) => {
            let reg = reg.clone();
            let predicate = predicate.to_string();
            Ok(Value::Lazy(lazy.filter_values(move |v| {
                reg.apply_predicate(&predicate, v)
            })))
        }
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("{} requires a sequence, got {}", call.name, other.kind()),
        )),
    }
}

fn op_reject(reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    let predicate = predicate_name(call)?;
    match subject {
        Value::Seq(items) => {
            let mut kept = Vec::new();
            for item in items {
                if !reg.apply_predicate(predicate, item)? {
                    kept.push(item.clone());
                }
            }
            Ok(Value::Seq(kept))
        }
        Value::Lazy(lazy) => {
            let reg = reg.clone();
            let predicate = predicate.to_string();
            Ok(Value::Lazy(lazy.filter_values(move |v| {
                Ok(!reg.apply_predicate(&predicate, v)?)
            })))
        }
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("reject requires a sequence, got {}", other.kind()),
        )),
    }
}

fn op_first(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    match prefix_count(call)? {
        None => match subject {
            Value::Seq(items) => Ok(items.first().cloned().unwrap_or(Value::Null)),
            Value::Lazy(lazy) => Ok(lazy.nth_value(0)?.unwrap_or(Value::Null)),
            other => Err(NavError::new(
                NavErrorKind::TypeMismatch,
                format!("first requires a sequence, got {}", other.kind()),
            )),
        },
        Some(count) => match subject {
            Value::Seq(items) => Ok(Value::Seq(items.iter().take(count).cloned().collect())),
            Value::Lazy(lazy) => Ok(Value::Seq(lazy.window(0, Some(count)).to_values()?)),
            other => Err(NavError::new(
                NavErrorKind::TypeMismatch,
                format!("first requires a sequence, got {}", other.kind()),
            )),
        },
    }
}

fn op_last(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    let items = elements(subject, "last")?;
    match prefix_count(call)? {
        None => Ok(items.last().cloned().unwrap_or(Value::Null)),
        Some(count) => {
            let skip = items.len().saturating_sub(count);
            Ok(Value::Seq(items[skip..].to_vec()))
        }
    }
}

/// Shared arg shape of `first` and `last`: nothing, or one non-negative
/// element count.
fn prefix_count(call: &OpCall) -> Result<Option<usize>, NavError> {
    match call.args.as_slice() {
        [] => Ok(None),
        [Value::Int(n)] if *n >= 0 => Ok(Some(*n as usize)),
        _ => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("{} takes an optional non-negative count", call.name),
        )),
    }
}

fn op_flatten(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    let depth = match call.args.as_slice() {
        [] => None,
        // Negative depth means full flattening, matching array semantics
        // navigation users expect.
        [Value::Int(n)] if *n < 0 => None,
        [Value::Int(n)] => Some(*n as u64),
        _ => {
            return Err(NavError::new(
                NavErrorKind::TypeMismatch,
                "flatten takes an optional integer depth",
            ));
        }
    };
    match subject {
        Value::Seq(items) => {
            let mut out = Vec::new();
            flatten_into(&mut out, items, depth);
            Ok(Value::Seq(out))
        }
        Value::Lazy(_) => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            "flatten is not available on a lazy sequence",
        )),
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("flatten requires a sequence, got {}", other.kind()),
        )),
    }
}

fn flatten_into(out: &mut Vec<Value>, items: &[Value], depth: Option<u64>) {
    for item in items {
        match item {
            Value::Seq(inner) if depth != Some(0) => {
                flatten_into(out, inner, depth.map(|d| d - 1));
            }
            other => out.push(other.clone()),
        }
    }
}

fn op_sort(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    let mut items = elements(subject, "sort")?;
    if items.iter().all(|v| v.as_f64().is_some()) {
        items.sort_by(|a, b| {
            let (a, b) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
            a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
        });
    } else if items.iter().all(|v| v.as_str().is_some()) {
        items.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
    } else {
        return Err(NavError::new(
            NavErrorKind::TypeMismatch,
            "sort requires uniformly numeric or string elements",
        ));
    }
    Ok(Value::Seq(items))
}

fn op_unique(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    let items = elements(subject, "unique")?;
    let mut kept: Vec<Value> = Vec::new();
    for item in items {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    Ok(Value::Seq(kept))
}

fn op_reverse(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    match subject {
        Value::Str(s) => Ok(Value::Str(s.chars().rev().collect())),
        _ => {
            let mut items = elements(subject, "reverse")?;
            items.reverse();
            Ok(Value::Seq(items))
        }
    }
}

fn op_join(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    let separator = match call.args.as_slice() {
        [] => "",
        [Value::Str(s)] => s.as_str(),
        _ => {
            return Err(NavError::new(
                NavErrorKind::TypeMismatch,
                "join takes an optional string separator",
            ));
        }
    };
    let items = elements(subject, "join")?;
    let mut parts = Vec::with_capacity(items.len());
    for item in &items {
        // Nulls render empty inside a join, not as the word "null".
        parts.push(match item {
            Value::Null => String::new(),
            other => stringify(other)?,
        });
    }
    Ok(Value::Str(parts.join(separator)))
}

// =====================
// Record and container views
// =====================

fn op_keys(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    match subject {
        Value::Map(fields) => Ok(fields.keys().map(|k| Value::from(k.as_str())).collect()),
        Value::Tuple(tuple) => Ok(tuple.iter().map(|(k, _)| Value::from(k)).collect()),
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("keys requires a record, got {}", other.kind()),
        )),
    }
}

fn op_values(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    match subject {
        Value::Map(fields) => Ok(fields.values().cloned().collect()),
        Value::Tuple(tuple) => Ok(tuple.iter().map(|(_, v)| v.clone()).collect()),
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("values requires a record, got {}", other.kind()),
        )),
    }
}

fn op_length(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    match subject {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::Seq(items) => Ok(Value::Int(items.len() as i64)),
        Value::Map(fields) => Ok(Value::Int(fields.len() as i64)),
        Value::Tuple(tuple) => Ok(Value::Int(tuple.len() as i64)),
        Value::Lazy(_) => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            "cannot take the length of a lazy sequence",
        )),
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("{} requires a container or string, got {}", call.name, other.kind()),
        )),
    }
}

// =====================
// Numeric folds
// =====================

fn op_sum(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    let items = elements(subject, "sum")?;
    let mut total = 0.0;
    for item in &items {
        total += item.as_f64().ok_or_else(|| {
            NavError::new(
                NavErrorKind::TypeMismatch,
                format!("sum requires numeric elements, got {}", item.kind()),
            )
        })?;
    }
    Ok(Value::Float(total))
}

fn op_min(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    pick_extreme(elements(subject, "min")?, "min", false)
}

fn op_max(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    pick_extreme(elements(subject, "max")?, "max", true)
}

/// Picks the least or greatest element; elements keep their original type.
/// An empty sequence has no extreme and yields null.
fn pick_extreme(items: Vec<Value>, op: &str, want_greater: bool) -> Result<Value, NavError> {
    if items.is_empty() {
        return Ok(Value::Null);
    }
    let pick = |ordering: std::cmp::Ordering| {
        if want_greater {
            ordering.is_gt()
        } else {
            ordering.is_lt()
        }
    };
    if items.iter().all(|v| v.as_f64().is_some()) {
        let mut best = items[0].clone();
        for item in &items[1..] {
            let (a, b) = (
                item.as_f64().unwrap_or(f64::NAN),
                best.as_f64().unwrap_or(f64::NAN),
            );
            if pick(a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)) {
                best = item.clone();
            }
        }
        Ok(best)
    } else if items.iter().all(|v| v.as_str().is_some()) {
        let mut best = items[0].clone();
        for item in &items[1..] {
            if pick(item.as_str().cmp(&best.as_str())) {
                best = item.clone();
            }
        }
        Ok(best)
    } else {
        Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("{} requires uniformly numeric or string elements", op),
        ))
    }
}

// =====================
// Scalar operations and predicates
// =====================

fn op_matches(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    let pattern = match call.args.as_slice() {
        [Value::Str(p)] => p.as_str(),
        _ => {
            return Err(NavError::new(
                NavErrorKind::TypeMismatch,
                "matches takes exactly one string pattern",
            ));
        }
    };
    let text = subject.as_str().ok_or_else(|| {
        NavError::new(
            NavErrorKind::TypeMismatch,
            format!("matches requires a string subject, got {}", subject.kind()),
        )
    })?;
    let re = Regex::new(pattern).map_err(|e| {
        NavError::new(
            NavErrorKind::TypeMismatch,
            format!("invalid pattern: {}", e),
        )
    })?;
    Ok(Value::Bool(re.is_match(text)))
}

fn op_to_string(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    Ok(Value::Str(stringify(subject)?))
}

fn op_even(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    match subject.as_i64() {
        Some(n) => Ok(Value::Bool(n % 2 == 0)),
        None => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("even is defined for integers, got {}", subject.kind()),
        )),
    }
}

fn op_odd(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    match subject.as_i64() {
        Some(n) => Ok(Value::Bool(n % 2 != 0)),
        None => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("odd is defined for integers, got {}", subject.kind()),
        )),
    }
}

fn op_null(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    Ok(Value::Bool(subject.is_null()))
}

fn op_empty(_reg: &OpRegistry, subject: &Value, call: &OpCall) -> Result<Value, NavError> {
    no_args(call)?;
    match subject {
        Value::Str(s) => Ok(Value::Bool(s.is_empty())),
        Value::Seq(items) => Ok(Value::Bool(items.is_empty())),
        Value::Map(fields) => Ok(Value::Bool(fields.is_empty())),
        Value::Tuple(tuple) => Ok(Value::Bool(tuple.is_empty())),
        Value::Lazy(lazy) => match lazy.items().next() {
            None => Ok(Value::Bool(true)),
            Some(Ok(_)) => Ok(Value::Bool(false)),
            Some(Err(e)) => Err(e),
        },
        other => Err(NavError::new(
            NavErrorKind::TypeMismatch,
            format!("empty is defined for containers and strings, got {}", other.kind()),
        )),
    }
}

// =====================
// Tests
// =====================
