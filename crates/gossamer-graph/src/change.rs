//! Structural change records
//!
//! Every mutation of a [`Graph`](crate::Graph) pushes exactly one record
//! to each subscriber, in mutation order. Records carry the affected
//! payload so consumers can act on removals after the graph has already
//! forgotten the entry.

use crate::graph::EdgeId;

/// One structural change to a graph
#[derive(Debug, Clone)]
pub enum GraphChange<K, N, E> {
    /// A node was inserted
    NodeAdded { key: K, payload: N },
    /// A node was removed
    NodeRemoved { key: K, payload: N },
    /// An edge was inserted
    EdgeAdded {
        id: EdgeId,
        from: K,
        to: K,
        payload: E,
    },
    /// An edge was removed
    EdgeRemoved {
        id: EdgeId,
        from: K,
        to: K,
        payload: E,
    },
    /// A payload cell settled or changed in place
    ///
    /// Bookkeeping only: the subject's identity and adjacency are
    /// unchanged.
    PayloadUpdated(Subject<K>),
}

/// The subject of a payload update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject<K> {
    Node(K),
    Edge(EdgeId),
}
