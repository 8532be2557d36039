//! Interface markers.
//!
//! A [`Marker`] is the identity of one interface's satisfaction condition. It has no
//! structure beyond equality: two markers are the same marker only if one is a copy of
//! the other. Markers are drawn from a process-wide sequence, so markers created by
//! different registries never collide.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// the sequence starts above genesis, so a zeroed marker can never be a real one
const GENESIS: u64 = 0;

static LOWER_BOUND: AtomicU64 = AtomicU64::new(GENESIS);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Marker(u64);

impl Marker {
    /// Creates a fresh marker. Markers are never released or reused.
    pub fn new() -> Self {
        Self(LOWER_BOUND.fetch_add(1, Ordering::Relaxed) + 1)
    }
    // Only useful for diagnostics; the number carries no meaning.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn markers_are_unique() {
        let markers: HashSet<Marker> = (0..1000).map(|_| Marker::new()).collect();
        assert_eq!(markers.len(), 1000);
    }

    #[test]
    fn copies_compare_equal() {
        let marker = Marker::new();
        let copy = marker;
        assert_eq!(marker, copy);
        assert_ne!(marker, Marker::new());
        assert!(marker.id() > GENESIS);
    }

    #[test]
    fn display_names_the_sequence_number() {
        let marker = Marker::new();
        assert_eq!(marker.to_string(), format!("marker#{}", marker.id()));
    }
}
