//! Server-sent event stream of device status
//!
//! `GET /v1/devices/:device_id/stream` sends the device's current snapshot
//! (if any) as the first event, then one `data:` event per ingested status
//! until the client goes away.

pub mod handler;

pub use handler::stream_device;
