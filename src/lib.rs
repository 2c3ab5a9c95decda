//! Humidity Hub
//!
//! Ingests humidity/temperature readings from networked sensors, evaluates
//! them against a threshold policy and streams each device's latest status
//! to live subscribers over server-sent events.
//!
//! # Modules
//!
//! - `hub`: Per-device publish/subscribe hub (status store, subscriber
//!   registry, fan-out)
//! - `policy`: Humidity threshold evaluation
//! - `types`: Device status and request/response bodies
//! - `config`: Environment-driven server configuration
//! - `api`: Axum router, REST handlers and the SSE stream
//!
//! # Example
//!
//! ```
//! use humidity_hub::{BroadcastHub, DeviceStatus};
//!
//! let hub = BroadcastHub::new();
//! let (mut subscription, snapshot) = hub.subscribe("greenhouse-1");
//! assert!(snapshot.is_none());
//!
//! hub.ingest(
//!     "greenhouse-1",
//!     DeviceStatus::new("greenhouse-1", 52.0, 21.5, false, "Humidity is normal."),
//! );
//! assert_eq!(subscription.try_recv().unwrap().humidity, 52.0);
//! ```

pub mod api;
pub mod config;
pub mod hub;
pub mod policy;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{ConfigError, ServerConfig};
pub use hub::{BroadcastHub, HubConfig, HubStats, IngestReport, Subscription};
pub use policy::{Assessment, HumidityPolicy};
pub use types::{DeviceStatus, HubResult, SensorReading, SensorResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
