//! Settlement cells for factory results
//!
//! A graph entry is registered before its factory settles, so the node
//! or edge payload is a [`Slot`]: a shared cell that starts pending and
//! settles exactly once, to a value or an error. Waiters observe the
//! settlement through a watch channel.

use tokio::sync::watch;

use crate::error::NetworkError;

enum SlotState<T> {
    Pending,
    Settled(T),
    Failed(NetworkError),
}

/// A shared cell holding the eventual result of an async creation
///
/// Cloning a slot shares the same cell. `Failed` is terminal, like
/// `Settled`.
pub struct Slot<T> {
    state: watch::Receiver<SlotState<T>>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone> Slot<T> {
    /// Create a pending slot and the settler that resolves it
    pub fn pending() -> (Self, SlotSettler<T>) {
        let (tx, rx) = watch::channel(SlotState::Pending);
        (Self { state: rx }, SlotSettler { tx: Some(tx) })
    }

    /// Await settlement and clone out the result
    pub async fn wait(&self) -> Result<T, NetworkError> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|state| !matches!(state, SlotState::Pending))
            .await
            .map_err(|_| NetworkError::Factory("creation aborted".into()))?;
        match &*state {
            SlotState::Settled(value) => Ok(value.clone()),
            SlotState::Failed(err) => Err(err.clone()),
            SlotState::Pending => unreachable!(),
        }
    }

    /// Snapshot read: `Some` only once settled successfully
    pub fn get(&self) -> Option<T> {
        match &*self.state.borrow() {
            SlotState::Settled(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Whether the slot has not settled yet
    pub fn is_pending(&self) -> bool {
        matches!(&*self.state.borrow(), SlotState::Pending)
    }
}

/// Write side of a [`Slot`]; consumed by settlement
///
/// Dropping an unused settler fails the slot so waiters unblock.
pub struct SlotSettler<T> {
    tx: Option<watch::Sender<SlotState<T>>>,
}

impl<T> SlotSettler<T> {
    /// Settle the slot with a value
    pub fn settle(mut self, value: T) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(SlotState::Settled(value));
        }
    }

    /// Settle the slot with an error
    pub fn fail(mut self, err: NetworkError) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(SlotState::Failed(err));
        }
    }
}

impl<T> Drop for SlotSettler<T> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(SlotState::Failed(NetworkError::Factory(
                "creation aborted".into(),
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_observes_settlement() {
        let (slot, settler) = Slot::pending();
        assert!(slot.is_pending());
        assert_eq!(slot.get(), None);

        let waiter = {
            let slot = slot.clone();
            tokio::spawn(async move { slot.wait().await })
        };

        settler.settle(7u32);
        assert_eq!(waiter.await.unwrap().unwrap(), 7);
        assert_eq!(slot.get(), Some(7));
        assert!(!slot.is_pending());
    }

    #[tokio::test]
    async fn test_failure_is_terminal_and_shared() {
        let (slot, settler) = Slot::<u32>::pending();
        settler.fail(NetworkError::CreationTimeout);

        assert!(matches!(
            slot.wait().await,
            Err(NetworkError::CreationTimeout)
        ));
        assert_eq!(slot.get(), None);
        assert!(!slot.is_pending());
    }

    #[tokio::test]
    async fn test_dropped_settler_unblocks_waiters() {
        let (slot, settler) = Slot::<u32>::pending();
        drop(settler);

        assert!(matches!(slot.wait().await, Err(NetworkError::Factory(_))));
    }
}
