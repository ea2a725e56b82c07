//! Pass-through channel implementation
//!
//! An in-memory loopback channel: payloads written with `send` come back
//! out of `recv` on the same object. This is the default channel wired in
//! when a connection factory declines to provide one, and it is also
//! handy for tests that only care about lifecycle, not traffic.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, mpsc, watch};

use crate::channel::Channel;
use crate::error::ChannelError;

/// An in-memory loopback channel
///
/// Sent payloads are buffered and handed back to `recv` in order. The
/// closed flag is carried on a watch channel so any number of observers
/// can await the close notification.
pub struct PassThrough {
    tx: mpsc::Sender<Bytes>,
    rx: Mutex<mpsc::Receiver<Bytes>>,
    closed: watch::Sender<bool>,
}

impl PassThrough {
    /// Create a pass-through channel with the default buffer size
    pub fn new() -> Self {
        Self::with_buffer_size(1024)
    }

    /// Create a pass-through channel with a specific buffer size
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);
        Self {
            tx,
            rx: Mutex::new(rx),
            closed: watch::Sender::new(false),
        }
    }
}

impl Default for PassThrough {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for PassThrough {
    async fn send(&self, data: Bytes) -> Result<(), ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        self.tx.send(data).await.map_err(|_| ChannelError::Closed)
    }

    async fn recv(&self) -> Result<Bytes, ChannelError> {
        let mut rx = self.rx.lock().await;
        loop {
            // Drain buffered payloads before reporting closure
            match rx.try_recv() {
                Ok(data) => return Ok(data),
                Err(mpsc::error::TryRecvError::Empty) => {
                    if self.is_closed() {
                        return Err(ChannelError::Closed);
                    }
                }
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    return Err(ChannelError::Closed);
                }
            }
            tokio::select! {
                data = rx.recv() => match data {
                    Some(data) => return Ok(data),
                    None => return Err(ChannelError::Closed),
                },
                _ = self.closed() => {}
            }
        }
    }

    async fn close(&self) {
        self.closed.send_replace(true);
    }

    async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        // wait_for errors only if the sender is dropped, which cannot
        // outlive self
        let _ = rx.wait_for(|closed| *closed).await;
    }

    fn is_closed(&self) -> bool {
        *self.closed.subscribe().borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_recv_round_trip() {
        let channel = PassThrough::new();

        channel.send(Bytes::from_static(b"hello")).await.unwrap();
        channel.send(Bytes::from_static(b"world")).await.unwrap();

        assert_eq!(channel.recv().await.unwrap(), Bytes::from_static(b"hello"));
        assert_eq!(channel.recv().await.unwrap(), Bytes::from_static(b"world"));
    }

    #[tokio::test]
    async fn test_close_notifies_observers() {
        let channel = std::sync::Arc::new(PassThrough::new());
        assert!(!channel.is_closed());

        let observer = {
            let channel = channel.clone();
            tokio::spawn(async move { channel.closed().await })
        };

        channel.close().await;
        observer.await.unwrap();
        assert!(channel.is_closed());

        // Idempotent
        channel.close().await;
        assert!(channel.is_closed());
    }

    #[tokio::test]
    async fn test_closed_resolves_immediately_when_already_closed() {
        let channel = PassThrough::new();
        channel.close().await;
        channel.closed().await;
    }

    #[tokio::test]
    async fn test_recv_drains_buffered_payloads_before_closing() {
        let channel = PassThrough::new();
        channel.send(Bytes::from_static(b"last")).await.unwrap();
        channel.close().await;

        assert_eq!(channel.recv().await.unwrap(), Bytes::from_static(b"last"));
        assert!(matches!(channel.recv().await, Err(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn test_send_and_recv_fail_after_close() {
        let channel = PassThrough::new();
        channel.close().await;

        assert!(matches!(
            channel.send(Bytes::from_static(b"x")).await,
            Err(ChannelError::Closed)
        ));
        assert!(matches!(channel.recv().await, Err(ChannelError::Closed)));
    }
}
