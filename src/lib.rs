//! Intermark – nominal interfaces for values that never inherited from them.
//!
//! Single inheritance lets a class declare one parent. Intermark lets it (or a plain
//! object) additionally declare any number of interfaces, and still answer the "is-a"
//! question for them quickly. It does so with explicit tags, never by inspecting shape:
//! * A [`marker::Marker`] is an opaque, process-unique token.
//! * An interface is a [`construct::Class`] bound to exactly one marker in a
//!   [`registry::Registry`].
//! * An implementor is a class or an [`construct::Object`] carrying the marker as a tag.
//! * A [`predicate::Predicate`] installed on the interface decides the "is-a" check by
//!   looking for the marker among the own and inherited tags of a value.
//!
//! ## Modules
//! * [`construct`] – Classes, objects, values and the tag carriers behind them.
//! * [`marker`] – Marker generation.
//! * [`registry`] – Binding markers to interfaces and evaluating "is-a" checks.
//! * [`tagging`] – Declaring that classes and objects implement interfaces.
//! * [`predicate`] – The installed predicates.
//! * [`settings`] – Layered settings (`config` crate).
//!
//! ## Inheritance
//! Binding a marker also stamps it on the interface's own template, so a class that
//! simply extends an interface satisfies it without any tagging. The same goes for
//! interfaces that extend other interfaces: implementing the composite one implements
//! every interface merged into it.
//!
//! ## Quick Start
//! ```
//! use intermark::{Class, Object, Registry, Value};
//! use serde_json::json;
//! let registry = Registry::new();
//! let animal = Class::new("Animal");
//! registry.bind_new_marker(&animal).unwrap();
//! let cat = Class::extends("Cat", &animal);
//! let tom = Value::from(cat.instantiate(Default::default()));
//! assert!(registry.satisfies(&tom, &animal));
//!
//! let walker = Class::new("Walker");
//! registry.bind_new_marker(&walker).unwrap();
//! let robot = registry.tag_with_interfaces(Object::empty(), &[&walker]).unwrap();
//! assert!(registry.satisfies(&Value::from(&robot), &walker));
//! assert!(!registry.satisfies(&Value::from(json!({"legs": 2})), &walker));
//! ```
//!
//! ## Threads
//! Binding and tagging are meant to run while types are being defined. Each carrier has
//! its own lock, so tagging two objects never contends, and evaluation only takes read
//! locks.

pub mod construct;
pub mod error;
pub mod marker;
pub mod predicate;
pub mod registry;
pub mod settings;
pub mod tagging;

pub use construct::{Class, ClassId, Implementor, Object, Value};
pub use error::{IntermarkError, Result};
pub use marker::Marker;
pub use predicate::Predicate;
pub use registry::Registry;
pub use settings::Settings;
pub use tagging::{tag_with_marker_value, tag_with_markers};
