//! Error types for network operations
//!
//! Every error fails only the operation that triggered it; a failed
//! creation unwinds its own registration rather than leaving an orphaned
//! pending entry in the graph.

use gossamer_core::{ChannelError, PeerId};
use thiserror::Error;

/// Errors raised by [`Network`](crate::Network) operations
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// The peer factory resolved to a peer whose id does not match the
    /// registered identifier.
    #[error("peer factory returned id {actual}, expected {expected}")]
    MalformedPeer { expected: PeerId, actual: PeerId },

    /// The connection factory handed back a channel that was already
    /// closed.
    #[error("connection factory returned a closed channel")]
    MalformedConnection,

    /// The referenced identifier is not registered.
    #[error("peer not found: {0}")]
    PeerNotFound(PeerId),

    /// A connection between the pair already exists (either direction,
    /// pending or open).
    #[error("connection between {from} and {to} already exists")]
    DuplicateConnection { from: PeerId, to: PeerId },

    /// No connection exists between the pair.
    #[error("no connection between {from} and {to}")]
    ConnectionNotFound { from: PeerId, to: PeerId },

    /// A factory did not settle within the configured creation timeout.
    #[error("creation timed out")]
    CreationTimeout,

    /// Channel layer error.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Failure surfaced by a user-supplied factory.
    #[error("factory error: {0}")]
    Factory(String),
}
