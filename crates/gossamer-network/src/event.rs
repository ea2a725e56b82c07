//! Network events
//!
//! Four fixed event kinds, derived from the graph's structural-change
//! stream and delivered on a forwarder task turn, never inside the
//! mutating call's own stack frame. Payload-update bookkeeping records
//! are swallowed; additions are announced only once their payload has
//! settled, and removals only for subjects that were announced.

use std::pin::Pin;

use futures::Stream;
use tokio::sync::broadcast;

use crate::connection::Connection;
use crate::peer::Peer;

/// Events emitted by a [`Network`](crate::Network)
#[derive(Debug, Clone)]
pub enum NetworkEvent<P: Peer> {
    /// A peer settled and joined the network
    PeerAdded(P),
    /// A settled peer was removed
    PeerDeleted(P),
    /// A connection settled and its edge is live
    ConnectionAdded(Connection<P>),
    /// A settled connection's edge was removed
    ConnectionDeleted(Connection<P>),
}

/// Convert a broadcast receiver into an async stream
///
/// A lagged receiver skips the overwritten events and continues; the
/// stream ends when the network is dropped.
pub(crate) fn into_stream<T: Clone + Send + 'static>(
    mut rx: broadcast::Receiver<T>,
) -> Pin<Box<dyn Stream<Item = T> + Send>> {
    Box::pin(async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => yield event,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
