//! Device status snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recent known state of one device
///
/// Built once per ingested reading and never mutated afterwards. The hub only
/// ever replaces the stored value for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub device_id: String,
    pub humidity: f64,
    pub temperature: f64,
    pub alert: bool,
    pub message: String,
    pub last_updated: DateTime<Utc>,
}

impl DeviceStatus {
    /// Create a status stamped with the current time
    pub fn new(
        device_id: impl Into<String>,
        humidity: f64,
        temperature: f64,
        alert: bool,
        message: impl Into<String>,
    ) -> Self {
        Self::at(device_id, humidity, temperature, alert, message, Utc::now())
    }

    /// Create a status with an explicit timestamp
    pub fn at(
        device_id: impl Into<String>,
        humidity: f64,
        temperature: f64,
        alert: bool,
        message: impl Into<String>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            humidity,
            temperature,
            alert,
            message: message.into(),
            last_updated,
        }
    }
}
