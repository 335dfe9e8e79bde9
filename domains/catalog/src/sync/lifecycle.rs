//! Lifecycle update notifications
//!
//! Each coordinator receives its own subscription at construction instead of
//! registering a callback with process-wide state. Dropping the subscription
//! unregisters it.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Default number of undelivered events kept per subscriber
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Re-check every catalog for manifest updates
    UpdateCheck,
}

/// Publisher side of the lifecycle signal
#[derive(Debug, Clone)]
pub struct LifecycleBus {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl LifecycleBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Notify every subscriber. Returns how many subscribers were notified.
    pub fn publish_update(&self) -> usize {
        match self.sender.send(LifecycleEvent::UpdateCheck) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!("Lifecycle update published with no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> LifecycleSubscription {
        LifecycleSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LifecycleBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// One registration with the lifecycle bus
#[derive(Debug)]
pub struct LifecycleSubscription {
    receiver: broadcast::Receiver<LifecycleEvent>,
}

impl LifecycleSubscription {
    /// Wait for the next update. `None` once the bus is gone.
    ///
    /// Events dropped because this subscriber fell behind count as one update.
    pub async fn next_update(&mut self) -> Option<()> {
        match self.receiver.recv().await {
            Ok(LifecycleEvent::UpdateCheck) => Some(()),
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Lifecycle subscriber lagged");
                Some(())
            }
            Err(RecvError::Closed) => None,
        }
    }

    /// Consume every event already queued. Returns true if any were pending.
    pub fn drain_pending(&mut self) -> bool {
        let mut pending = false;
        loop {
            match self.receiver.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => pending = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return pending,
            }
        }
    }
}
