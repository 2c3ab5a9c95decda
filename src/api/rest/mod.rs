//! REST endpoints
//!
//! - `POST /v1/humidity` - Ingest a sensor reading
//! - `GET /v1/devices` - Latest status of every device
//! - `GET /v1/devices/:device_id/latest` - Latest status of one device
//! - `GET /v1/hub` - Hub counters

pub mod devices;
pub mod readings;

use serde::Serialize;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }
}
