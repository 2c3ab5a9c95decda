//! Sending half of a subscriber mailbox

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::update::StatusUpdate;

/// Identifier assigned to each subscription by the hub
pub type SubscriberId = u64;

/// Outcome of a single non-blocking delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The status was queued for the subscriber
    Delivered,
    /// The mailbox was full; `consecutive` counts drops since the last success
    Dropped { consecutive: u32 },
    /// The subscriber's receiver is gone
    Closed,
}

/// Registry-side reference to a subscriber's bounded mailbox
///
/// Clones share the drop counter, so counts survive registry snapshots.
#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    id: SubscriberId,
    tx: mpsc::Sender<StatusUpdate>,
    consecutive_drops: Arc<AtomicU32>,
}

impl SubscriberHandle {
    pub fn new(id: SubscriberId, tx: mpsc::Sender<StatusUpdate>) -> Self {
        Self {
            id,
            tx,
            consecutive_drops: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Try to enqueue `update` without waiting for capacity
    pub fn try_deliver(&self, update: &StatusUpdate) -> Delivery {
        match self.tx.try_send(update.clone()) {
            Ok(()) => {
                self.consecutive_drops.store(0, Ordering::Relaxed);
                Delivery::Delivered
            }
            Err(TrySendError::Full(_)) => {
                let consecutive = self.consecutive_drops.fetch_add(1, Ordering::Relaxed) + 1;
                Delivery::Dropped { consecutive }
            }
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceStatus;

    fn update(seq: u64) -> StatusUpdate {
        StatusUpdate::new(seq, DeviceStatus::new("dev", 50.0, 20.0, false, "Humidity is normal."))
    }

    #[test]
    fn test_full_mailbox_counts_consecutive_drops() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = SubscriberHandle::new(7, tx);
        let status = update(1);

        assert_eq!(handle.try_deliver(&status), Delivery::Delivered);
        assert_eq!(handle.try_deliver(&status), Delivery::Dropped { consecutive: 1 });
        assert_eq!(handle.try_deliver(&status), Delivery::Dropped { consecutive: 2 });

        rx.try_recv().unwrap();
        assert_eq!(handle.try_deliver(&status), Delivery::Delivered);

        // A success resets the run of drops
        assert_eq!(handle.try_deliver(&status), Delivery::Dropped { consecutive: 1 });
    }

    #[test]
    fn test_closed_receiver() {
        let (tx, rx) = mpsc::channel(4);
        let handle = SubscriberHandle::new(1, tx);
        drop(rx);

        assert_eq!(handle.try_deliver(&update(1)), Delivery::Closed);
    }
}
