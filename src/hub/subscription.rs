//! Receiving half of a subscriber mailbox

use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;

use super::handle::SubscriberId;
use super::registry::SubscriberRegistry;
use super::update::StatusUpdate;
use crate::types::DeviceStatus;

/// A live subscription to one device's status updates
///
/// Owns the receiving end of the mailbox. Cleanup deregisters the mailbox
/// first and then closes it, exactly once, either through
/// [`Subscription::unsubscribe`] or when the value is dropped.
///
/// An ingest racing with `subscribe` can land both in the snapshot and in the
/// mailbox. Queued updates whose sequence number is not past the snapshot's
/// are skipped, so readers never see the snapshot twice.
pub struct Subscription {
    device_id: String,
    id: SubscriberId,
    rx: mpsc::Receiver<StatusUpdate>,
    registry: Arc<dyn SubscriberRegistry>,
    snapshot_seq: u64,
    released: bool,
}

impl Subscription {
    pub(crate) fn new(
        device_id: String,
        id: SubscriberId,
        rx: mpsc::Receiver<StatusUpdate>,
        registry: Arc<dyn SubscriberRegistry>,
        snapshot_seq: u64,
    ) -> Self {
        Self {
            device_id,
            id,
            rx,
            registry,
            snapshot_seq,
            released: false,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next delivered status
    ///
    /// Returns `None` once the hub no longer holds this mailbox and every
    /// queued status has been read.
    pub async fn recv(&mut self) -> Option<DeviceStatus> {
        loop {
            let update = self.rx.recv().await?;
            if update.seq > self.snapshot_seq {
                return Some(update.status);
            }
        }
    }

    /// Take a queued status without waiting
    pub fn try_recv(&mut self) -> Option<DeviceStatus> {
        loop {
            let update = self.rx.try_recv().ok()?;
            if update.seq > self.snapshot_seq {
                return Some(update.status);
            }
        }
    }

    /// Deregister from the hub and close the mailbox
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Turn the subscription into a stream that yields `initial` first
    ///
    /// Dropping the stream releases the subscription.
    pub fn into_stream(self, initial: Option<DeviceStatus>) -> impl Stream<Item = DeviceStatus> + Send {
        let mut subscription = self;
        async_stream::stream! {
            if let Some(status) = initial {
                yield status;
            }
            while let Some(status) = subscription.recv().await {
                yield status;
            }
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        // Deregister before closing so fan-out never targets a closed mailbox
        self.registry.unregister(&self.device_id, self.id);
        self.rx.close();

        tracing::info!(device_id = %self.device_id, subscriber = self.id, "subscriber released");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("device_id", &self.device_id)
            .field("id", &self.id)
            .field("snapshot_seq", &self.snapshot_seq)
            .field("released", &self.released)
            .finish()
    }
}
