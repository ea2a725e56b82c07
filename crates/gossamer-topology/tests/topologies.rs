//! Integration tests for bulk topology construction.
//!
//! Tests cover:
//! - Peer/connection count invariants per shape
//! - Settlement completeness: counts are final the moment a build returns
//! - Identity stability of the index map within one build
//! - Custom factories through the config path
//! - Error propagation out of a failed build
//! - Teardown of a built network

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_test::assert_ok;

use gossamer_core::PeerId;
use gossamer_network::{
    BasicPeer, DefaultConnectionFactory, Network, NetworkConfig, NetworkError, PeerFactory,
};
use gossamer_topology::{Topology, build, build_with};

struct CountingPeerFactory {
    calls: AtomicUsize,
}

impl CountingPeerFactory {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PeerFactory<BasicPeer> for CountingPeerFactory {
    async fn create_peer(&self, id: PeerId) -> Result<BasicPeer, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BasicPeer::new(id))
    }
}

struct FailingPeerFactory;

#[async_trait]
impl PeerFactory<BasicPeer> for FailingPeerFactory {
    async fn create_peer(&self, _id: PeerId) -> Result<BasicPeer, NetworkError> {
        Err(NetworkError::Factory("refused".into()))
    }
}

/// Counts are read straight off the returned network: snapshots only
/// show settled entries, so exact counts double as the settlement check.
fn assert_counts(network: &Network, peers: usize, connections: usize) {
    assert_eq!(network.peers().len(), peers);
    assert_eq!(network.connections().len(), connections);
}

// ============================================================
// Count invariants
// ============================================================

#[tokio::test]
async fn test_balanced_tree_counts() {
    let network = build(Topology::BalancedTree { depth: 2 }).await.unwrap();
    assert_counts(&network, 7, 6); // 2^(d+1) - 1 peers, one less edge

    let network = build(Topology::BalancedTree { depth: 3 }).await.unwrap();
    assert_counts(&network, 15, 14);
}

#[tokio::test]
async fn test_grid_counts() {
    let network = build(Topology::Grid { rows: 10, cols: 10 }).await.unwrap();
    assert_counts(&network, 100, 180); // m*(n-1) + n*(m-1)
}

#[tokio::test]
async fn test_ladder_counts() {
    let network = build(Topology::Ladder { rungs: 4 }).await.unwrap();
    assert_counts(&network, 8, 10); // 3n - 2
}

#[tokio::test]
async fn test_complete_counts() {
    let network = build(Topology::Complete { n: 5 }).await.unwrap();
    assert_counts(&network, 5, 10); // C(5,2)
}

#[tokio::test]
async fn test_small_shape_counts() {
    let line = build(Topology::Line { n: 5 }).await.unwrap();
    assert_counts(&line, 5, 4);

    let ring = build(Topology::Ring { n: 6 }).await.unwrap();
    assert_counts(&ring, 6, 6);

    let star = build(Topology::Star { n: 6 }).await.unwrap();
    assert_counts(&star, 6, 5);
}

#[tokio::test]
async fn test_random_with_certain_probability_is_complete() {
    let network = build(Topology::Random { n: 5, p: 1.0 }).await.unwrap();
    assert_counts(&network, 5, 10);
}

#[tokio::test]
async fn test_watts_strogatz_lattice_counts() {
    let network = build(Topology::WattsStrogatz {
        n: 10,
        k: 4,
        beta: 0.0,
    })
    .await
    .unwrap();
    assert_counts(&network, 10, 20); // n * k / 2
}

#[tokio::test]
async fn test_custom_edge_list() {
    let network = build(Topology::Custom {
        edges: vec![(0, 1), (1, 2)],
    })
    .await
    .unwrap();
    // Peers implied by the endpoints
    assert_counts(&network, 3, 2);
}

// ============================================================
// Identity stability
// ============================================================

#[tokio::test]
async fn test_repeated_indices_name_the_same_peer() {
    let network = build(Topology::Custom {
        edges: vec![(0, 1), (0, 2), (0, 3)],
    })
    .await
    .unwrap();
    assert_counts(&network, 4, 3);

    // Index 0 resolved to one identifier across all three edges: a
    // single hub appears in every connection.
    let connections = network.connections();
    let hub = connections[0].from.id;
    assert!(
        connections
            .iter()
            .all(|connection| connection.from.id == hub || connection.to.id == hub)
    );
}

// ============================================================
// Configuration and failure paths
// ============================================================

#[tokio::test]
async fn test_build_with_runs_the_supplied_factory_once_per_peer() {
    let factory = CountingPeerFactory::new();
    let config = NetworkConfig::new(factory.clone(), Arc::new(DefaultConnectionFactory));

    let network = tokio_test::assert_ok!(build_with(Topology::BalancedTree { depth: 2 }, config).await);
    assert_counts(&network, 7, 6);
    assert_eq!(factory.calls.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn test_failed_creation_fails_the_build() {
    let config = NetworkConfig::new(
        Arc::new(FailingPeerFactory),
        Arc::new(DefaultConnectionFactory),
    );

    let err = build_with(Topology::Line { n: 3 }, config)
        .await
        .unwrap_err();
    assert!(matches!(err, NetworkError::Factory(_)));
}

// ============================================================
// Teardown
// ============================================================

#[tokio::test]
async fn test_destroy_after_build() {
    let network = build(Topology::Grid { rows: 3, cols: 3 }).await.unwrap();
    let channels: Vec<_> = network
        .connections()
        .into_iter()
        .map(|connection| connection.channel)
        .collect();
    assert_eq!(channels.len(), 12);

    network.destroy().await.unwrap();

    assert_counts(&network, 0, 0);
    assert!(channels.iter().all(|channel| channel.is_closed()));
}
