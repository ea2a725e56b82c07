//! Channel abstraction for peer connections
//!
//! The [`Channel`] trait is the only thing the network layer knows about
//! the data path between two peers: a bidirectional byte stream that can
//! be closed from either side and reports that closure to observers.
//!
//! ## Implementations
//!
//! - [`PassThrough`](crate::PassThrough): In-memory loopback channel used
//!   as the default when a connection factory returns no channel
//! - Applications supply their own implementations for anything richer
//!   (latency models, fault injection, real sockets)

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ChannelError;

/// A bidirectional byte channel between two peers
///
/// Closing is idempotent and observable: once either side closes the
/// channel, every pending and future [`closed`](Channel::closed) call
/// resolves, and `send`/`recv` fail with [`ChannelError::Closed`].
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send a payload into the channel
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] if the channel has been closed.
    async fn send(&self, data: Bytes) -> Result<(), ChannelError>;

    /// Receive the next payload from the channel
    ///
    /// Blocks until a payload is available or the channel closes.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] once the channel is closed and
    /// drained.
    async fn recv(&self) -> Result<Bytes, ChannelError>;

    /// Close the channel
    ///
    /// Idempotent. Triggers the close notification for all observers.
    async fn close(&self);

    /// Resolve once the channel has closed (from either side)
    ///
    /// Resolves immediately if the channel is already closed.
    async fn closed(&self);

    /// Whether the channel has been closed
    fn is_closed(&self) -> bool;
}
