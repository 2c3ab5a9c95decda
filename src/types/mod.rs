//! Data types shared by the hub and the HTTP layer

mod reading;
mod status;

pub use reading::{SensorReading, SensorResponse};
pub use status::DeviceStatus;

/// Result type for fallible server-level operations
pub type HubResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
