//! Per-device publish/subscribe hub
//!
//! The hub keeps the latest status of every device and fans each newly
//! ingested status out to the device's live subscribers.
//!
//! ## Delivery model
//! - Every subscriber owns a bounded mailbox (default 10 slots)
//! - Fan-out uses non-blocking sends only, so a slow subscriber never stalls
//!   the ingesting task
//! - A full mailbox loses that one update; the subscriber stays registered
//! - A mailbox whose receiver is gone is evicted on the next ingest
//! - New subscribers get the current snapshot, never missed history

mod handle;
mod registry;
mod store;
mod subscription;
mod update;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::types::DeviceStatus;

pub use handle::{Delivery, SubscriberHandle, SubscriberId};
pub use registry::{InMemorySubscriberRegistry, SubscriberRegistry};
pub use store::{InMemoryStatusStore, StatusStore};
pub use subscription::Subscription;
pub use update::StatusUpdate;

/// Mailbox capacity used when none is configured
pub const DEFAULT_CHANNEL_CAPACITY: usize = 10;

/// Largest mailbox capacity the hub will allocate
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// Tuning for the hub's delivery path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// Slots in each subscriber mailbox, clamped to `1..=MAX_CHANNEL_CAPACITY`
    pub channel_capacity: usize,
    /// Evict a subscriber after this many drops in a row; `None` never evicts
    /// on fullness alone
    pub max_consecutive_drops: Option<u32>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_consecutive_drops: None,
        }
    }
}

/// What happened to one ingested status during fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub delivered: usize,
    pub dropped: usize,
    pub evicted: usize,
}

/// Point-in-time counters for the hub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    /// Devices with a stored status
    pub devices: usize,
    /// Devices with at least one live subscriber
    pub subscribed_devices: usize,
    /// Live subscribers across all devices
    pub subscribers: usize,
}

/// Latest-status store plus subscriber registry with fan-out
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct BroadcastHub {
    store: Arc<dyn StatusStore>,
    registry: Arc<dyn SubscriberRegistry>,
    config: HubConfig,
    next_id: Arc<AtomicU64>,
    next_seq: Arc<AtomicU64>,
}

impl BroadcastHub {
    /// Create a hub with in-memory backends and default settings
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        Self::with_backends(
            Arc::new(InMemoryStatusStore::new()),
            Arc::new(InMemorySubscriberRegistry::new()),
            config,
        )
    }

    /// Create a hub over caller-supplied store and registry
    pub fn with_backends(
        store: Arc<dyn StatusStore>,
        registry: Arc<dyn SubscriberRegistry>,
        config: HubConfig,
    ) -> Self {
        let config = HubConfig {
            channel_capacity: config.channel_capacity.clamp(1, MAX_CHANNEL_CAPACITY),
            ..config
        };
        Self {
            store,
            registry,
            config,
            next_id: Arc::new(AtomicU64::new(1)),
            next_seq: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn config(&self) -> HubConfig {
        self.config
    }

    pub fn registry(&self) -> &Arc<dyn SubscriberRegistry> {
        &self.registry
    }

    /// Store `status` as the device's latest and offer it to every subscriber
    pub fn ingest(&self, device_id: &str, status: DeviceStatus) -> IngestReport {
        let update = StatusUpdate::new(self.next_seq.fetch_add(1, Ordering::Relaxed), status);
        self.store.put(device_id, update.clone());

        let mut report = IngestReport::default();
        let handles = self.registry.snapshot(device_id);
        if handles.is_empty() {
            return report;
        }

        let mut stale = Vec::new();
        for handle in &handles {
            match handle.try_deliver(&update) {
                Delivery::Delivered => report.delivered += 1,
                Delivery::Dropped { consecutive } => {
                    report.dropped += 1;
                    tracing::warn!(
                        device_id = %device_id,
                        subscriber = handle.id(),
                        consecutive,
                        "channel full, dropping update"
                    );
                    if self
                        .config
                        .max_consecutive_drops
                        .is_some_and(|limit| consecutive >= limit)
                    {
                        stale.push(handle.id());
                    }
                }
                Delivery::Closed => stale.push(handle.id()),
            }
        }

        if !stale.is_empty() {
            report.evicted = self.registry.evict(device_id, &stale);
            tracing::info!(device_id = %device_id, evicted = report.evicted, "evicted stale subscribers");
        }

        report
    }

    /// Attach a new subscriber to `device_id`
    ///
    /// Returns the subscription together with the device's current snapshot,
    /// if one exists. The snapshot is read after registration, so no update
    /// ingested in between can be missed.
    pub fn subscribe(&self, device_id: &str) -> (Subscription, Option<DeviceStatus>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);

        self.registry
            .register(device_id, SubscriberHandle::new(id, tx));
        let snapshot = self.store.get(device_id);
        let snapshot_seq = snapshot.as_ref().map_or(0, |update| update.seq);

        let subscription = Subscription::new(
            device_id.to_string(),
            id,
            rx,
            Arc::clone(&self.registry),
            snapshot_seq,
        );
        (subscription, snapshot.map(|update| update.status))
    }

    /// Deregister a subscriber by id; `false` if it was already gone
    ///
    /// The owning [`Subscription`] still closes its mailbox when released.
    pub fn unsubscribe(&self, device_id: &str, id: SubscriberId) -> bool {
        self.registry.unregister(device_id, id)
    }

    pub fn get_latest(&self, device_id: &str) -> Option<DeviceStatus> {
        self.store.get(device_id).map(|update| update.status)
    }

    pub fn list_all(&self) -> Vec<DeviceStatus> {
        self.store
            .list_all()
            .into_iter()
            .map(|update| update.status)
            .collect()
    }

    /// Detach every subscriber of one device
    ///
    /// Their streams end once they have drained what is already queued.
    pub fn close_device(&self, device_id: &str) -> usize {
        self.registry.replace(device_id, Vec::new()).len()
    }

    /// Detach every subscriber of every device (used on shutdown)
    pub fn close_all(&self) -> usize {
        let closed: usize = self
            .registry
            .devices()
            .iter()
            .map(|device_id| self.close_device(device_id))
            .sum();
        tracing::info!(closed, "closed all subscriber channels");
        closed
    }

    pub fn stats(&self) -> HubStats {
        let devices = self.registry.devices();
        HubStats {
            devices: self.store.len(),
            subscribed_devices: devices.len(),
            subscribers: devices
                .iter()
                .map(|d| self.registry.subscriber_count(d))
                .sum(),
        }
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
