//! The marker registry.
//!
//! A [`Registry`] keeps, per interface class, the marker it is bound to and the predicate
//! installed on it. Entries are keyed by [`ClassId`], so the registry never keeps a class
//! alive. Bindings are permanent: there is no unbind.
//!
//! Tests and embedders should create their own registry; [`Registry::global`] exists for
//! code that wants a single process-wide one.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lazy_static::lazy_static;
use serde_json::Value as JsonValue;
use tracing::{debug, trace, warn};

use crate::construct::{Class, ClassHasher, ClassId, Value};
use crate::error::{IntermarkError, Result};
use crate::marker::Marker;
use crate::predicate::Predicate;
use crate::settings::Settings;

lazy_static! {
    static ref GLOBAL: Registry = Registry::with_settings(&Settings::load().unwrap_or_default());
}

#[derive(Debug)]
pub(crate) struct Binding {
    pub(crate) interface: String,
    pub(crate) marker: Option<Marker>,
    pub(crate) predicate: Option<Predicate>,
}

impl Binding {
    fn new(interface: &Class) -> Self {
        Self {
            interface: interface.name().to_owned(),
            marker: None,
            predicate: None,
        }
    }
}

#[derive(Debug)]
pub struct Registry {
    kept: RwLock<HashMap<ClassId, Binding, ClassHasher>>,
    trace_evaluations: bool,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }
    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            kept: RwLock::new(HashMap::with_capacity_and_hasher(
                settings.registry_capacity,
                ClassHasher::default(),
            )),
            trace_evaluations: settings.trace_evaluations,
        }
    }
    /// The process-wide registry, created on first use from [`Settings::load`].
    pub fn global() -> &'static Registry {
        &GLOBAL
    }
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, HashMap<ClassId, Binding, ClassHasher>> {
        self.kept.read().unwrap_or_else(PoisonError::into_inner)
    }
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ClassId, Binding, ClassHasher>> {
        self.kept.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The marker bound to `interface`, or `None` if it was never bound.
    pub fn interface_marker(&self, interface: &Class) -> Option<Marker> {
        self.read().get(&interface.id()).and_then(|binding| binding.marker)
    }

    /// Binds `marker` to `interface`.
    ///
    /// On the first bind the marker is also stamped on the interface's own template, so
    /// that plain subclasses satisfy the interface, and the marker predicate is installed
    /// unless a predicate is already present. Binding the marker the interface already
    /// has does nothing. Binding a different one fails and leaves the binding untouched.
    pub fn bind_marker(&self, interface: &Class, marker: Marker) -> Result<()> {
        let mut kept = self.write();
        let binding = kept
            .entry(interface.id())
            .or_insert_with(|| Binding::new(interface));
        match binding.marker {
            Some(bound) if bound == marker => return Ok(()),
            Some(bound) => {
                warn!(interface = %interface.name(), %bound, requested = %marker, "conflicting marker rejected");
                return Err(IntermarkError::ConflictingMarker {
                    interface: interface.name().to_owned(),
                    bound,
                    requested: marker,
                });
            }
            None => (),
        }
        binding.marker = Some(marker);
        interface.template().stamp([(marker, JsonValue::Null)]);
        if binding.predicate.is_none() {
            binding.predicate = Some(Predicate::for_marker(marker));
            debug!(interface = %interface.name(), %marker, "predicate installed");
        }
        debug!(interface = %interface.name(), %marker, "marker bound");
        Ok(())
    }

    /// Binds a freshly generated marker and returns it for reuse with
    /// [`tag_with_markers`](crate::tagging::tag_with_markers).
    pub fn bind_new_marker(&self, interface: &Class) -> Result<Marker> {
        let marker = Marker::new();
        self.bind_marker(interface, marker)?;
        Ok(marker)
    }

    /// Installs `predicate` on `interface` unless one is installed already. Returns
    /// whether it was installed. A later [`bind_marker`](Self::bind_marker) keeps a
    /// predicate installed here.
    pub fn install_predicate(&self, interface: &Class, predicate: Predicate) -> bool {
        let mut kept = self.write();
        let binding = match kept.entry(interface.id()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(Binding::new(interface)),
        };
        if binding.predicate.is_some() {
            return false;
        }
        debug!(interface = %interface.name(), ?predicate, "predicate installed");
        binding.predicate = Some(predicate);
        true
    }

    pub fn has_predicate(&self, interface: &Class) -> bool {
        self.read()
            .get(&interface.id())
            .is_some_and(|binding| binding.predicate.is_some())
    }

    /// The "is-a" check. Uses the predicate installed on `interface` when there is one,
    /// and native inheritance otherwise. Never fails: a predicate that panics counts as
    /// `false`.
    pub fn satisfies(&self, value: &Value, interface: &Class) -> bool {
        // the predicate is cloned out so no lock is held while it runs
        let predicate = self
            .read()
            .get(&interface.id())
            .and_then(|binding| binding.predicate.clone());
        let satisfied = match predicate {
            Some(predicate) => {
                // a panicking predicate answers false, like any other failed lookup
                panic::catch_unwind(AssertUnwindSafe(|| predicate.evaluate(value))).unwrap_or_else(|_| {
                    warn!(interface = %interface.name(), "predicate panicked, treated as not satisfied");
                    false
                })
            }
            None => interface.is_ancestor_of(value),
        };
        if self.trace_evaluations {
            trace!(interface = %interface.name(), satisfied, "evaluated");
        }
        satisfied
    }

    /// Number of interfaces bound to a marker.
    pub fn len(&self) -> usize {
        self.read()
            .values()
            .filter(|binding| binding.marker.is_some())
            .count()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Names of the bound interfaces, sorted.
    pub fn interfaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .values()
            .filter(|binding| binding.marker.is_some())
            .map(|binding| binding.interface.clone())
            .collect();
        names.sort();
        names
    }
}
