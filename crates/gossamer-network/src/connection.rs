//! Connections and their edge-side bookkeeping

use std::fmt;
use std::sync::Arc;

use gossamer_core::{Channel, PeerId};
use tokio::sync::watch;

use crate::peer::Peer;
use crate::slot::Slot;

/// An established connection between two peers
///
/// The `from`/`to` distinction records creation order only; the channel
/// is bidirectional and deletion treats the pair as unordered.
pub struct Connection<P: Peer> {
    pub from: P,
    pub to: P,
    pub channel: Arc<dyn Channel>,
}

impl<P: Peer> Connection<P> {
    /// Whether this connection joins the given pair, in either direction
    pub fn joins(&self, a: &PeerId, b: &PeerId) -> bool {
        let (from, to) = (self.from.id(), self.to.id());
        (from == *a && to == *b) || (from == *b && to == *a)
    }
}

impl<P: Peer> Clone for Connection<P> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            channel: self.channel.clone(),
        }
    }
}

impl<P: Peer> fmt::Debug for Connection<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

/// Edge payload: the connection's settlement cell plus the removal gate
///
/// The gate fires after the edge has been erased from the graph, which
/// is what deletion waiters block on.
pub(crate) struct Link<P: Peer> {
    pub slot: Slot<Connection<P>>,
    removed: Arc<watch::Sender<bool>>,
}

impl<P: Peer> Link<P> {
    pub fn new(slot: Slot<Connection<P>>) -> Self {
        Self {
            slot,
            removed: Arc::new(watch::Sender::new(false)),
        }
    }

    /// Fire the removal gate; idempotent
    pub fn mark_removed(&self) {
        self.removed.send_replace(true);
    }

    /// Resolve once the edge has been erased from the graph
    pub async fn removed(&self) {
        let mut rx = self.removed.subscribe();
        let _ = rx.wait_for(|removed| *removed).await;
    }
}

impl<P: Peer> Clone for Link<P> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            removed: self.removed.clone(),
        }
    }
}
