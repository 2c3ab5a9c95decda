//! Latest-status cache

use std::collections::HashMap;

use parking_lot::RwLock;

use super::update::StatusUpdate;

/// Storage for the most recent status of every device
///
/// Writes are total replacements. Entries live for the lifetime of the
/// process; there is no eviction of offline devices. Each entry keeps the
/// ingest sequence number it was stored with.
pub trait StatusStore: Send + Sync {
    /// Overwrite the stored status for a device
    fn put(&self, device_id: &str, update: StatusUpdate);

    /// Look up the stored status for a device
    fn get(&self, device_id: &str) -> Option<StatusUpdate>;

    /// Copy out every stored status (order unspecified)
    fn list_all(&self) -> Vec<StatusUpdate>;

    /// Number of devices with a stored status
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `StatusStore` backed by a map behind one reader/writer lock
#[derive(Debug, Default)]
pub struct InMemoryStatusStore {
    statuses: RwLock<HashMap<String, StatusUpdate>>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusStore for InMemoryStatusStore {
    fn put(&self, device_id: &str, update: StatusUpdate) {
        self.statuses.write().insert(device_id.to_string(), update);
    }

    fn get(&self, device_id: &str) -> Option<StatusUpdate> {
        self.statuses.read().get(device_id).cloned()
    }

    fn list_all(&self) -> Vec<StatusUpdate> {
        self.statuses.read().values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.statuses.read().len()
    }
}
