//! Peer contract
//!
//! A peer is whatever the application says it is, as long as it reports
//! the identifier it was registered under. The default [`BasicPeer`] is
//! a bare record carrying nothing else.

use std::fmt::Debug;

use gossamer_core::PeerId;
use serde::{Deserialize, Serialize};

/// Contract for application-defined peer values
///
/// The network validates that a factory-produced peer reports the same
/// identifier it was registered under.
pub trait Peer: Clone + Debug + Send + Sync + 'static {
    /// The identifier this peer was created for
    fn id(&self) -> PeerId;
}

/// Default peer record: just the identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicPeer {
    pub id: PeerId,
}

impl BasicPeer {
    /// Create a peer record for the given identifier
    pub fn new(id: PeerId) -> Self {
        Self { id }
    }
}

impl Peer for BasicPeer {
    fn id(&self) -> PeerId {
        self.id
    }
}
