//! Declaring that classes and objects implement interfaces.
//!
//! Tagging a class stamps its template, so every instance and every subclass inherits the
//! tag. Tagging an object stamps only that object.

use serde_json::Value as JsonValue;
use tracing::{trace, warn};

use crate::construct::{Class, Implementor};
use crate::error::{IntermarkError, Result};
use crate::marker::Marker;
use crate::registry::Registry;

/// Stamps each marker the target does not carry as an own tag yet, with a `null` tag
/// value. Returns the target for chaining.
pub fn tag_with_markers<T: Implementor>(target: T, markers: &[Marker]) -> T {
    let stamped = target
        .carrier()
        .stamp(markers.iter().map(|marker| (*marker, JsonValue::Null)));
    trace!(implementor = %target.describe(), stamped, requested = markers.len(), "tagged with markers");
    target
}

/// Stamps a single marker with a caller-chosen tag value. The value is not interpreted
/// here; an already present own tag keeps its original value.
pub fn tag_with_marker_value<T: Implementor>(target: T, marker: Marker, value: JsonValue) -> T {
    let stamped = target.carrier().stamp([(marker, value)]);
    trace!(implementor = %target.describe(), %marker, stamped, "tagged with marker value");
    target
}

impl Registry {
    /// Resolves the marker of every interface, in argument order. The first interface
    /// without a marker fails the whole call before anything is stamped.
    pub fn markers_of(&self, interfaces: &[&Class]) -> Result<Vec<Marker>> {
        let kept = self.read();
        interfaces
            .iter()
            .enumerate()
            .map(|(position, interface)| {
                kept.get(&interface.id())
                    .and_then(|binding| binding.marker)
                    .ok_or_else(|| {
                        warn!(interface = %interface.name(), position, "interface has no marker");
                        IntermarkError::UnboundInterface {
                            interface: interface.name().to_owned(),
                            position,
                        }
                    })
            })
            .collect()
    }

    /// Tags `target` with the marker of each interface. Every interface must have been
    /// bound; otherwise [`IntermarkError::UnboundInterface`] is returned and the target's
    /// tags are left as they were.
    pub fn tag_with_interfaces<T: Implementor>(&self, target: T, interfaces: &[&Class]) -> Result<T> {
        let markers = self.markers_of(interfaces)?;
        Ok(tag_with_markers(target, &markers))
    }

    /// Declares that instances of `class`, present and future, implement `interfaces`.
    pub fn implements_interface(&self, class: &Class, interfaces: &[&Class]) -> Result<()> {
        self.tag_with_interfaces(class, interfaces)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::Object;
    use serde_json::json;

    #[test]
    fn markers_resolve_in_argument_order() {
        let registry = Registry::new();
        let foo = Class::new("Foo");
        let bar = Class::new("Bar");
        let foo_marker = registry.bind_new_marker(&foo).expect("bind");
        let bar_marker = registry.bind_new_marker(&bar).expect("bind");
        let markers = registry.markers_of(&[&bar, &foo]).expect("markers");
        assert_eq!(markers, vec![bar_marker, foo_marker]);
    }

    #[test]
    fn first_unbound_interface_is_reported() {
        let registry = Registry::new();
        let bound = Class::new("Bound");
        let loose = Class::new("Loose");
        let later = Class::new("Later");
        registry.bind_new_marker(&bound).expect("bind");
        match registry.markers_of(&[&bound, &loose, &later]) {
            Err(IntermarkError::UnboundInterface { interface, position }) => {
                assert_eq!(interface, "Loose");
                assert_eq!(position, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn tag_values_are_kept_as_given() {
        let marker = Marker::new();
        let object = tag_with_marker_value(Object::empty(), marker, json!("Foo Like"));
        let object = tag_with_markers(object, &[marker]);
        assert_eq!(object.tag_value(marker), Some(json!("Foo Like")));
    }

    #[test]
    fn no_interfaces_is_a_no_op() {
        let registry = Registry::new();
        let object = registry.tag_with_interfaces(Object::empty(), &[]).expect("tag");
        assert_eq!(object.carrier().own_len(), 0);
    }
}
