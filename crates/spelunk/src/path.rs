//! Path vocabulary: the segment kinds a navigation consumes left to right.
//!
//! A path is a plain `&[Segment]`. Five segment kinds exist:
//!
//! - `Key` — index the subject by a name, position, or span
//! - `Iterate` — enter collection context and fan out over elements
//! - `Quote(key)` — index by a key whose descriptor spelling would otherwise
//!   read as a marker; evaluates exactly like `Key`
//! - `Rebox` — wrap the subject (or the whole collection) back into a single
//!   sequence value and return to unit context
//! - `Invoke` — apply a named operation from the registry

use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Key(Key),
    Iterate,
    Quote(Key),
    Rebox,
    Invoke(OpCall),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// Field name of a record or tuple.
    Name(String),
    /// Position in a sequence, tuple, or bit position in an integer.
    /// Negative positions count from the end where the subject is bounded.
    Index(i64),
    /// Contiguous range of positions.
    Span(Span),
}

/// Half-open or closed position range. `None` bounds mean "from the start" /
/// "to the end". `exclusive` applies to `end` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub exclusive: bool,
}

/// One operation invocation: a registry name, literal arguments, an optional
/// named predicate for operations that take one (`with`), and the scope that
/// decides whether the operation sees each element or a whole collection.
#[derive(Debug, Clone, PartialEq)]
pub struct OpCall {
    pub name: String,
    pub args: Vec<Value>,
    pub with: Option<String>,
    pub scope: OpScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpScope {
    /// Applied to the unit subject, or mapped over each element in
    /// collection context.
    Subject,
    /// Applied once to the whole collection; invalid in unit context.
    Stream,
}

// =====================
// Construction helpers
// =====================

impl Segment {
    pub fn key(key: impl Into<Key>) -> Self {
        Segment::Key(key.into())
    }

    pub fn quote(key: impl Into<Key>) -> Self {
        Segment::Quote(key.into())
    }
}

impl OpCall {
    pub fn subject(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            with: None,
            scope: OpScope::Subject,
        }
    }

    pub fn stream(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            with: None,
            scope: OpScope::Stream,
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn with(mut self, predicate: impl Into<String>) -> Self {
        self.with = Some(predicate.into());
        self
    }
}

impl Span {
    pub fn new(start: Option<i64>, end: Option<i64>, exclusive: bool) -> Self {
        Self {
            start,
            end,
            exclusive,
        }
    }
}

impl From<Range<i64>> for Span {
    fn from(r: Range<i64>) -> Self {
        Span::new(Some(r.start), Some(r.end), true)
    }
}

impl From<RangeInclusive<i64>> for Span {
    fn from(r: RangeInclusive<i64>) -> Self {
        Span::new(Some(*r.start()), Some(*r.end()), false)
    }
}

impl From<RangeFrom<i64>> for Span {
    fn from(r: RangeFrom<i64>) -> Self {
        Span::new(Some(r.start), None, false)
    }
}

impl From<RangeTo<i64>> for Span {
    fn from(r: RangeTo<i64>) -> Self {
        Span::new(None, Some(r.end), true)
    }
}

impl From<RangeToInclusive<i64>> for Span {
    fn from(r: RangeToInclusive<i64>) -> Self {
        Span::new(None, Some(r.end), false)
    }
}

impl From<RangeFull> for Span {
    fn from(_: RangeFull) -> Self {
        Span::new(None, None, false)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::Index(index as i64)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index as i64)
    }
}

impl From<Span> for Key {
    fn from(span: Span) -> Self {
        Key::Span(span)
    }
}

impl From<Range<i64>> for Key {
    fn from(r: Range<i64>) -> Self {
        Key::Span(r.into())
    }
}

impl From<RangeInclusive<i64>> for Key {
    fn from(r: RangeInclusive<i64>) -> Self {
        Key::Span(r.into())
    }
}

impl From<RangeFrom<i64>> for Key {
    fn from(r: RangeFrom<i64>) -> Self {
        Key::Span(r.into())
    }
}

impl From<RangeTo<i64>> for Key {
    fn from(r: RangeTo<i64>) -> Self {
        Key::Span(r.into())
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Key(name.into())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::Key(name.into())
    }
}

impl From<i64> for Segment {
    fn from(index: i64) -> Self {
        Segment::Key(index.into())
    }
}

impl From<i32> for Segment {
    fn from(index: i32) -> Self {
        Segment::Key(index.into())
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Key(index.into())
    }
}

impl From<Span> for Segment {
    fn from(span: Span) -> Self {
        Segment::Key(Key::Span(span))
    }
}

impl From<Range<i64>> for Segment {
    fn from(r: Range<i64>) -> Self {
        Segment::Key(r.into())
    }
}

impl From<RangeInclusive<i64>> for Segment {
    fn from(r: RangeInclusive<i64>) -> Self {
        Segment::Key(r.into())
    }
}

impl From<RangeFrom<i64>> for Segment {
    fn from(r: RangeFrom<i64>) -> Self {
        Segment::Key(r.into())
    }
}

impl From<RangeTo<i64>> for Segment {
    fn from(r: RangeTo<i64>) -> Self {
        Segment::Key(r.into())
    }
}

impl From<Key> for Segment {
    fn from(key: Key) -> Self {
        Segment::Key(key)
    }
}

impl From<OpCall> for Segment {
    fn from(call: OpCall) -> Self {
        Segment::Invoke(call)
    }
}

// =====================
// Rendering
// =====================

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        write!(f, "..")?;
        if let Some(end) = self.end {
            if !self.exclusive {
                write!(f, "=")?;
            }
            write!(f, "{}", end)?;
        }
        Ok(())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Index(index) => write!(f, "[{}]", index),
            Key::Span(span) => write!(f, "[{}]", span),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Iterate => write!(f, "[]"),
            Segment::Quote(key) => write!(f, "quote({})", key),
            Segment::Rebox => write!(f, "[[]]"),
            Segment::Invoke(call) => write!(f, "{}()", call.name),
        }
    }
}

impl Segment {
    /// Appends this segment to a rendered trail. Name-like segments join
    /// with a dot, bracket-like segments attach directly.
    pub(crate) fn extend_trail(&self, trail: &str) -> String {
        match self {
            Segment::Key(Key::Name(_)) | Segment::Quote(_) | Segment::Invoke(_) => {
                format!("{}.{}", trail, self)
            }
            _ => format!("{}{}", trail, self),
        }
    }
}
