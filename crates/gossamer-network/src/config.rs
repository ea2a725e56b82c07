//! Network configuration

use std::sync::Arc;
use std::time::Duration;

use crate::factory::{
    ConnectionFactory, DefaultConnectionFactory, DefaultPeerFactory, PeerFactory,
};
use crate::peer::{BasicPeer, Peer};

/// Configuration for a [`Network`](crate::Network)
pub struct NetworkConfig<P: Peer = BasicPeer> {
    /// Produces peer values; defaults to bare [`BasicPeer`] records
    pub create_peer: Arc<dyn PeerFactory<P>>,
    /// Produces connection channels; defaults to pass-through channels
    pub create_channel: Arc<dyn ConnectionFactory<P>>,
    /// Capacity of the event broadcast channel
    pub event_capacity: usize,
    /// Upper bound on a single factory invocation
    ///
    /// `None` (the default) waits forever; a factory that never settles
    /// then leaves its entry pending and blocks deletion of it.
    pub creation_timeout: Option<Duration>,
}

impl<P: Peer> NetworkConfig<P> {
    /// Configuration with explicit factories and default tuning
    pub fn new(
        create_peer: Arc<dyn PeerFactory<P>>,
        create_channel: Arc<dyn ConnectionFactory<P>>,
    ) -> Self {
        Self {
            create_peer,
            create_channel,
            event_capacity: 256,
            creation_timeout: None,
        }
    }

    /// Bound every factory invocation by `limit`
    pub fn with_creation_timeout(mut self, limit: Duration) -> Self {
        self.creation_timeout = Some(limit);
        self
    }

    /// Use a specific event broadcast capacity
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

impl Default for NetworkConfig<BasicPeer> {
    fn default() -> Self {
        Self::new(
            Arc::new(DefaultPeerFactory),
            Arc::new(DefaultConnectionFactory),
        )
    }
}

impl<P: Peer> Clone for NetworkConfig<P> {
    fn clone(&self) -> Self {
        Self {
            create_peer: self.create_peer.clone(),
            create_channel: self.create_channel.clone(),
            event_capacity: self.event_capacity,
            creation_timeout: self.creation_timeout,
        }
    }
}
