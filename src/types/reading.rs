//! Request/response bodies for sensor ingest

use serde::{Deserialize, Serialize};

/// Reading posted by a device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub device_id: String,
    pub humidity: f64,
    pub temperature: f64,
}

/// Reply to a device after its reading was evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorResponse {
    pub status: String,
    pub message: String,
    pub alert: bool,
}

impl SensorResponse {
    pub fn ok(alert: bool, message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            alert,
        }
    }
}
