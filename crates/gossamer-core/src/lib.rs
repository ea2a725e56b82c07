//! # Gossamer Core
//!
//! Identifiers and channel abstractions shared by the Gossamer stack.
//!
//! This crate is the leaf of the workspace: it knows nothing about graphs
//! or networks, only about how peers are named and how bytes flow between
//! them.
//!
//! ## Key Types
//!
//! - [`PeerId`]: Opaque 32-byte identifier naming a peer
//! - [`Channel`]: Bidirectional byte channel with a close notification
//! - [`PassThrough`]: In-memory loopback channel, the default used when a
//!   connection factory yields no channel of its own

pub mod channel;
pub mod error;
pub mod id;
pub mod passthrough;

// Re-export main types
pub use channel::*;
pub use error::*;
pub use id::*;
pub use passthrough::*;
