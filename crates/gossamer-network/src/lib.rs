//! # Gossamer Network
//!
//! Async orchestration layer for simulated peer networks.
//!
//! A [`Network`] is a concurrency-safe, event-emitting graph of peers
//! and connections whose payloads are the results of pending
//! asynchronous factory calls. Registration is synchronous, settlement
//! is asynchronous, and deletion unwinds in-flight and established
//! connections before it completes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gossamer_core::PeerId;
//! use gossamer_network::Network;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gossamer_network::NetworkError> {
//!     let network = Network::new();
//!
//!     let a = PeerId::generate();
//!     let b = PeerId::generate();
//!     let connection = network.add_connection(a, b).await?; // auto-creates both peers
//!
//!     assert_eq!(network.peers().len(), 2);
//!     connection.channel.close().await;
//!
//!     network.destroy().await?;
//!     assert!(network.peers().is_empty());
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Factories
//!
//! Peers and channels are produced by user-supplied async factories
//! ([`PeerFactory`], [`ConnectionFactory`]), both with documented
//! defaults. A factory's result settles the entry that was registered
//! when the operation started.
//!
//! ### Events
//!
//! Four typed event kinds ([`NetworkEvent`]) derived from the graph's
//! structural-change stream and delivered on a separate task turn.
//!
//! ### Teardown
//!
//! `delete_peer`, `delete_connection` and `destroy` resolve only after
//! every severed channel has fully closed.

pub mod config;
pub mod connection;
pub mod error;
pub mod event;
pub mod factory;
pub mod network;
pub mod peer;
pub mod slot;

// Re-export main types
pub use config::*;
pub use connection::Connection;
pub use error::*;
pub use event::NetworkEvent;
pub use factory::*;
pub use network::*;
pub use peer::*;
pub use slot::*;
