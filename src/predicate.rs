//! Predicates decide whether a value satisfies an interface.
//!
//! A predicate is installed on an interface class at most once. The one installed by
//! [`Registry::bind_marker`](crate::registry::Registry::bind_marker) answers `true` exactly
//! when the interface's marker is reachable as an own or inherited tag on the value.
//! Predicates are total: any value, including `Null` and primitives, yields a boolean.

use std::fmt;
use std::sync::Arc;

use crate::construct::{Implementor, Value};
use crate::marker::Marker;

type Check = dyn Fn(&Value) -> bool + Send + Sync;

#[derive(Clone)]
pub struct Predicate {
    check: Arc<Check>,
    marker: Option<Marker>,
}

impl Predicate {
    /// Wraps a custom check. It is expected to answer `false` for values it does not
    /// understand; [`Registry::satisfies`](crate::registry::Registry::satisfies) also
    /// turns a panic into `false`.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            marker: None,
        }
    }
    pub fn for_marker(marker: Marker) -> Self {
        Self {
            check: Arc::new(move |value: &Value| carries_marker(value, marker)),
            marker: Some(marker),
        }
    }
    /// The marker this predicate tests for, if it is a marker predicate.
    pub fn marker(&self) -> Option<Marker> {
        self.marker
    }
    pub fn evaluate(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.marker {
            Some(marker) => write!(f, "Predicate({})", marker),
            None => write!(f, "Predicate(custom)"),
        }
    }
}

/// The tag lookup behind every marker predicate. Only objects can carry tags, so every
/// other kind of value resolves to `false`.
pub fn carries_marker(value: &Value, marker: Marker) -> bool {
    match value {
        Value::Object(object) => object.carries(marker),
        _ => false,
    }
}
