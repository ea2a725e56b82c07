//! The topology builder
//!
//! Bridges integer-indexed shape calls to real network creations. Every
//! `add_node`/`add_edge` spawns the corresponding asynchronous creation;
//! [`TopologyBuilder::finish`] waits for all of them to settle (success
//! or failure) before handing the network back, so the caller never
//! observes a half-built topology.

use gossamer_network::{BasicPeer, Network, NetworkConfig, NetworkError, Peer};
use tokio::task::JoinSet;
use tracing::debug;

use crate::idmap::IdMap;
use crate::shapes::{ShapeBuilder, Topology};

/// Drives shape calls into a [`Network`]
pub struct TopologyBuilder<P: Peer = BasicPeer> {
    network: Network<P>,
    ids: IdMap,
    creations: JoinSet<Result<(), NetworkError>>,
}

impl<P: Peer> TopologyBuilder<P> {
    /// Builder over a fresh identifier map for the given network
    pub fn new(network: Network<P>) -> Self {
        Self {
            network,
            ids: IdMap::new(),
            creations: JoinSet::new(),
        }
    }

    /// Wait for every spawned creation to settle and return the network
    ///
    /// # Errors
    ///
    /// The first creation error, after all creations have settled. On
    /// success the returned network's peer and connection counts are
    /// final.
    pub async fn finish(mut self) -> Result<Network<P>, NetworkError> {
        let mut first_error = None;
        while let Some(joined) = self.creations.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(err) => Err(NetworkError::Factory(err.to_string())),
            };
            if let Err(err) = result {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        match first_error {
            None => Ok(self.network),
            Some(err) => Err(err),
        }
    }
}

impl<P: Peer> ShapeBuilder for TopologyBuilder<P> {
    fn add_node(&mut self, index: u64) {
        let id = self.ids.get(index);
        let network = self.network.clone();
        self.creations
            .spawn(async move { network.add_peer(id).await.map(|_| ()) });
    }

    fn add_edge(&mut self, from: u64, to: u64) {
        let from = self.ids.get(from);
        let to = self.ids.get(to);
        let network = self.network.clone();
        self.creations
            .spawn(async move { network.add_connection(from, to).await.map(|_| ()) });
    }
}

/// Build a topology over a network with the default factories
pub async fn build(topology: Topology) -> Result<Network<BasicPeer>, NetworkError> {
    build_with(topology, NetworkConfig::default()).await
}

/// Build a topology over a network with explicit configuration
///
/// Composes a fresh network and identifier map, drives the shape, and
/// returns only once every creation has settled.
pub async fn build_with<P: Peer>(
    topology: Topology,
    config: NetworkConfig<P>,
) -> Result<Network<P>, NetworkError> {
    debug!(topology = ?topology, "building topology");
    let mut builder = TopologyBuilder::new(Network::with_config(config));
    topology.drive(&mut builder);
    builder.finish().await
}
