//! Integer-index identifier map
//!
//! Shape algorithms speak in small integer indices; peers are named by
//! opaque identifiers. The map pins each index to a freshly generated
//! identifier for the lifetime of one build, so repeated references to
//! the same index always mean the same peer.

use std::collections::HashMap;

use gossamer_core::PeerId;

/// Stable mapping from integer indices to peer identifiers
///
/// Driven serially by a single build; not shared across builds.
#[derive(Debug, Default)]
pub struct IdMap {
    ids: HashMap<u64, PeerId>,
}

impl IdMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// The identifier for an index, generated on first use
    pub fn get(&mut self, index: u64) -> PeerId {
        *self.ids.entry(index).or_insert_with(PeerId::generate)
    }

    /// Number of distinct indices seen
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no index has been mapped yet
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_index_same_identifier() {
        let mut map = IdMap::new();
        let first = map.get(3);
        let second = map.get(3);
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_distinct_indices_distinct_identifiers() {
        let mut map = IdMap::new();
        let a = map.get(0);
        let b = map.get(1);
        assert_ne!(a, b);
        assert_eq!(map.len(), 2);
    }
}
