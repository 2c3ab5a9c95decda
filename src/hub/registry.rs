//! Per-device registry of live subscriber mailboxes

use std::collections::HashMap;

use parking_lot::RwLock;

use super::handle::{SubscriberHandle, SubscriberId};

/// Tracks which mailboxes are attached to which device
///
/// A device key exists only while it has at least one subscriber. Removal is
/// by subscriber id and is always idempotent.
pub trait SubscriberRegistry: Send + Sync {
    /// Append a mailbox to the device's collection
    fn register(&self, device_id: &str, handle: SubscriberHandle);

    /// Remove the first mailbox with `id`; returns `false` if it was not there
    fn unregister(&self, device_id: &str, id: SubscriberId) -> bool;

    /// Copy of the device's current collection, for delivery outside the lock
    fn snapshot(&self, device_id: &str) -> Vec<SubscriberHandle>;

    /// Swap the device's whole collection, returning the previous one
    ///
    /// An empty `handles` removes the device entry.
    fn replace(&self, device_id: &str, handles: Vec<SubscriberHandle>) -> Vec<SubscriberHandle>;

    /// Remove every mailbox whose id is in `ids`; returns how many were removed
    fn evict(&self, device_id: &str, ids: &[SubscriberId]) -> usize;

    fn contains(&self, device_id: &str) -> bool;

    /// Devices that currently have subscribers
    fn devices(&self) -> Vec<String>;

    fn subscriber_count(&self, device_id: &str) -> usize;
}

/// `SubscriberRegistry` backed by a map behind one reader/writer lock
#[derive(Debug, Default)]
pub struct InMemorySubscriberRegistry {
    subscribers: RwLock<HashMap<String, Vec<SubscriberHandle>>>,
}

impl InMemorySubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriberRegistry for InMemorySubscriberRegistry {
    fn register(&self, device_id: &str, handle: SubscriberHandle) {
        self.subscribers
            .write()
            .entry(device_id.to_string())
            .or_default()
            .push(handle);
    }

    fn unregister(&self, device_id: &str, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        let Some(handles) = subscribers.get_mut(device_id) else {
            return false;
        };

        let removed = match handles.iter().position(|h| h.id() == id) {
            Some(index) => {
                handles.remove(index);
                true
            }
            None => false,
        };

        if handles.is_empty() {
            subscribers.remove(device_id);
        }
        removed
    }

    fn snapshot(&self, device_id: &str) -> Vec<SubscriberHandle> {
        self.subscribers
            .read()
            .get(device_id)
            .cloned()
            .unwrap_or_default()
    }

    fn replace(&self, device_id: &str, handles: Vec<SubscriberHandle>) -> Vec<SubscriberHandle> {
        let mut subscribers = self.subscribers.write();
        let previous = if handles.is_empty() {
            subscribers.remove(device_id)
        } else {
            subscribers.insert(device_id.to_string(), handles)
        };
        previous.unwrap_or_default()
    }

    fn evict(&self, device_id: &str, ids: &[SubscriberId]) -> usize {
        let mut subscribers = self.subscribers.write();
        let Some(handles) = subscribers.get_mut(device_id) else {
            return 0;
        };

        let before = handles.len();
        handles.retain(|h| !ids.contains(&h.id()));
        let removed = before - handles.len();

        if handles.is_empty() {
            subscribers.remove(device_id);
        }
        removed
    }

    fn contains(&self, device_id: &str) -> bool {
        self.subscribers.read().contains_key(device_id)
    }

    fn devices(&self) -> Vec<String> {
        self.subscribers.read().keys().cloned().collect()
    }

    fn subscriber_count(&self, device_id: &str) -> usize {
        self.subscribers
            .read()
            .get(device_id)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn handle(id: SubscriberId) -> SubscriberHandle {
        let (tx, _rx) = mpsc::channel(1);
        SubscriberHandle::new(id, tx)
    }

    #[test]
    fn test_register_creates_entry() {
        let registry = InMemorySubscriberRegistry::new();
        registry.register("dev", handle(1));
        registry.register("dev", handle(2));

        assert!(registry.contains("dev"));
        assert_eq!(registry.subscriber_count("dev"), 2);
        let ids: Vec<_> = registry.snapshot("dev").iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_unregister_last_removes_entry() {
        let registry = InMemorySubscriberRegistry::new();
        registry.register("dev", handle(1));

        assert!(registry.unregister("dev", 1));
        assert!(!registry.contains("dev"));
        assert!(registry.devices().is_empty());
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let registry = InMemorySubscriberRegistry::new();
        registry.register("dev", handle(1));
        registry.register("dev", handle(2));

        assert!(registry.unregister("dev", 1));
        assert!(!registry.unregister("dev", 1));
        assert!(!registry.unregister("other", 1));
        assert_eq!(registry.subscriber_count("dev"), 1);
    }

    #[test]
    fn test_replace_with_empty_removes_entry() {
        let registry = InMemorySubscriberRegistry::new();
        registry.register("dev", handle(1));
        registry.register("dev", handle(2));

        let previous = registry.replace("dev", Vec::new());
        assert_eq!(previous.len(), 2);
        assert!(!registry.contains("dev"));
    }

    #[test]
    fn test_replace_swaps_collection() {
        let registry = InMemorySubscriberRegistry::new();
        registry.register("dev", handle(1));

        registry.replace("dev", vec![handle(5), handle(6)]);
        let ids: Vec<_> = registry.snapshot("dev").iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn test_evict_keeps_others() {
        let registry = InMemorySubscriberRegistry::new();
        for id in 1..=4 {
            registry.register("dev", handle(id));
        }

        assert_eq!(registry.evict("dev", &[2, 4, 9]), 2);
        let ids: Vec<_> = registry.snapshot("dev").iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec![1, 3]);

        assert_eq!(registry.evict("dev", &[1, 3]), 2);
        assert!(!registry.contains("dev"));
        assert_eq!(registry.subscriber_count("dev"), 0);
    }
}
