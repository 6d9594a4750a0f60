//! Lazy sequences: restartable, possibly unbounded streams of values.
//!
//! A `LazySeq` owns a generator closure, not buffered elements. Every
//! enumeration calls the generator for a fresh iterator, so a handle can be
//! cloned and re-walked from the start any number of times. Navigation steps
//! applied to a lazy subject stack further closures on top instead of forcing
//! elements; errors raised inside a stacked step are deferred and surface
//! only when the affected element is materialized.

use std::fmt;
use std::sync::Arc;

use crate::error::NavError;
use crate::value::Value;

/// One materialized element, or the error deferred at its position.
pub type LazyItem = Result<Value, NavError>;

/// A single enumeration pass over a lazy sequence.
pub type LazyItems = Box<dyn Iterator<Item = LazyItem>>;

type Generator = Arc<dyn Fn() -> LazyItems + Send + Sync>;

#[derive(Clone)]
pub struct LazySeq {
    r#gen: Generator,
}

impl LazySeq {
    /// Wraps an infallible iterator factory. The factory runs once per
    /// enumeration, so side effects repeat on every pass.
    pub fn new<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Iterator<Item = Value> + 'static,
    {
        Self {
            r#gen: Arc::new(move || Box::new(factory().map(Ok))),
        }
    }

    /// Wraps a factory whose iterator can carry deferred errors.
    pub fn try_new<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Iterator<Item = LazyItem> + 'static,
    {
        Self {
            r#gen: Arc::new(move || Box::new(factory())),
        }
    }

    /// A lazy view over an owned, already-materialized vector.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self::new(move || values.clone().into_iter())
    }

    /// Starts one enumeration pass from the first element.
    pub fn items(&self) -> LazyItems {
        (self.r#gen)()
    }

    /// Drains the sequence into a vector, surfacing the first deferred
    /// error. Does not terminate on an unbounded sequence.
    pub fn to_values(&self) -> Result<Vec<Value>, NavError> {
        self.items().collect()
    }

    /// Forces elements up to `index` and returns the one there, if any.
    pub fn nth_value(&self, index: usize) -> Result<Option<Value>, NavError> {
        self.items().nth(index).transpose()
    }

    /// A window of the sequence: drop `skip` elements, then yield at most
    /// `take` (all remaining when `None`). Still lazy.
    pub(crate) fn window(&self, skip: usize, take: Option<usize>) -> LazySeq {
        let r#gen = self.r#gen.clone();
        LazySeq {
            r#gen: Arc::new(move || {
                let rest = r#gen().skip(skip);
                match take {
                    Some(n) => Box::new(rest.take(n)) as LazyItems,
                    None => Box::new(rest),
                }
            }),
        }
    }

    /// Applies a fallible element transform without forcing anything.
    pub(crate) fn map_values<F>(&self, f: F) -> LazySeq
    where
        F: Fn(Value) -> LazyItem + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let r#gen = self.r#gen.clone();
        LazySeq {
            r#gen: Arc::new(move || {
                let f = f.clone();
                Box::new(r#gen().map(move |item| item.and_then(|v| f(v))))
            }),
        }
    }

    /// Expands each element into zero or more items without forcing anything.
    /// A deferred error passes through as a single item.
    pub(crate) fn flat_map_values<F>(&self, f: F) -> LazySeq
    where
        F: Fn(Value) -> LazyItems + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let r#gen = self.r#gen.clone();
        LazySeq {
            r#gen: Arc::new(move || {
                let f = f.clone();
                Box::new(r#gen().flat_map(move |item| match item {
                    Ok(v) => f(v),
                    Err(e) => Box::new(std::iter::once(Err(e))) as LazyItems,
                }))
            }),
        }
    }

    /// Keeps elements the fallible predicate accepts, lazily. A predicate
    /// error is deferred at the position of the element that raised it.
    pub(crate) fn filter_values<F>(&self, keep: F) -> LazySeq
    where
        F: Fn(&Value) -> Result<bool, NavError> + Send + Sync + 'static,
    {
        let keep = Arc::new(keep);
        let r#gen = self.r#gen.clone();
        LazySeq {
            r#gen: Arc::new(move || {
                let keep = keep.clone();
                Box::new(r#gen().filter_map(move |item| match item {
                    Ok(v) => match keep(&v) {
                        Ok(true) => Some(Ok(v)),
                        Ok(false) => None,
                        Err(e) => Some(Err(e)),
                    },
                    Err(e) => Some(Err(e)),
                }))
            }),
        }
    }
}

impl fmt::Debug for LazySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySeq").finish_non_exhaustive()
    }
}

/// Identity comparison: two handles are equal only when they share one
/// generator. Element-wise comparison would force the stream.
impl PartialEq for LazySeq {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.r#gen, &other.r#gen)
    }
}
