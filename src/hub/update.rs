//! Sequenced status updates

use crate::types::DeviceStatus;

/// A device status tagged with the hub-wide ingest sequence number
///
/// Sequence numbers increase with every ingest, independent of the wall
/// clock stamped into `status.last_updated`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub seq: u64,
    pub status: DeviceStatus,
}

impl StatusUpdate {
    pub fn new(seq: u64, status: DeviceStatus) -> Self {
        Self { seq, status }
    }
}
