//! # Gossamer Topology
//!
//! Bulk construction of Gossamer networks in named combinatorial shapes.
//!
//! Each build composes a fresh [`Network`](gossamer_network::Network) and
//! [`IdMap`], drives a [`Topology`] against the integer-indexed builder
//! interface, and returns the network only once every peer and connection
//! creation has settled: immediately after the call returns, the peer and
//! connection counts reflect the complete, final topology.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gossamer_topology::{Topology, build};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gossamer_network::NetworkError> {
//!     let network = build(Topology::Grid { rows: 10, cols: 10 }).await?;
//!     assert_eq!(network.peers().len(), 100);
//!     assert_eq!(network.connections().len(), 180);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod idmap;
pub mod shapes;

// Re-export main types
pub use builder::*;
pub use idmap::*;
pub use shapes::*;
