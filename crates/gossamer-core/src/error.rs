//! Error types for Gossamer channels

use thiserror::Error;

/// Errors raised by channel operations
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    #[error("channel is closed")]
    Closed,
}
