//! Factories for peers and connection channels
//!
//! The network materializes graph entries through these user-supplied
//! asynchronous factories. Both have documented built-in defaults:
//! [`DefaultPeerFactory`] produces a bare [`BasicPeer`], and
//! [`DefaultConnectionFactory`] declines to produce a channel, which
//! makes the network wire in a pass-through channel.

use async_trait::async_trait;
use gossamer_core::{Channel, PeerId};

use crate::error::NetworkError;
use crate::peer::{BasicPeer, Peer};

/// Produces the peer value for a registered identifier
///
/// May suspend arbitrarily; the network registers the identifier before
/// invoking the factory, so concurrent operations referencing the same
/// peer share one invocation.
#[async_trait]
pub trait PeerFactory<P: Peer>: Send + Sync {
    /// Create the peer value for `id`
    ///
    /// # Errors
    ///
    /// A factory error fails the triggering `add_peer` (or the
    /// `add_connection` that auto-created the endpoint).
    async fn create_peer(&self, id: PeerId) -> Result<P, NetworkError>;
}

/// Produces the channel for a new connection
#[async_trait]
pub trait ConnectionFactory<P: Peer>: Send + Sync {
    /// Create the channel joining `from` and `to`
    ///
    /// Returning `Ok(None)` asks the network to wire in the default
    /// pass-through channel.
    async fn create_channel(
        &self,
        from: &P,
        to: &P,
    ) -> Result<Option<Box<dyn Channel>>, NetworkError>;
}

/// Default peer factory: a bare record carrying the identifier
#[derive(Debug, Default)]
pub struct DefaultPeerFactory;

#[async_trait]
impl PeerFactory<BasicPeer> for DefaultPeerFactory {
    async fn create_peer(&self, id: PeerId) -> Result<BasicPeer, NetworkError> {
        Ok(BasicPeer::new(id))
    }
}

/// Default connection factory: always defers to the pass-through channel
#[derive(Debug, Default)]
pub struct DefaultConnectionFactory;

#[async_trait]
impl<P: Peer> ConnectionFactory<P> for DefaultConnectionFactory {
    async fn create_channel(
        &self,
        _from: &P,
        _to: &P,
    ) -> Result<Option<Box<dyn Channel>>, NetworkError> {
        Ok(None)
    }
}
