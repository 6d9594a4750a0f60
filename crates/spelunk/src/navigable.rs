//! Mix-in style entry point: anything convertible to a [`Value`] can be
//! navigated in place, including `serde_json::Value` documents.

use crate::error::NavError;
use crate::eval::{navigate, navigate_with};
use crate::ops::OpRegistry;
use crate::path::Segment;
use crate::value::Value;

pub trait Navigable: Clone + Into<Value> {
    /// Navigates a clone of `self` along `path` with the builtin
    /// operations.
    fn navigate(&self, path: &[Segment]) -> Result<Value, NavError> {
        navigate(self.clone(), path)
    }

    /// Navigates with a caller-supplied operation registry.
    fn navigate_with(&self, registry: &OpRegistry, path: &[Segment]) -> Result<Value, NavError> {
        navigate_with(registry, self.clone(), path)
    }
}

impl<T: Clone + Into<Value>> Navigable for T {}
