//! Shared application state for HTTP handlers

use std::time::Duration;

use crate::config::ServerConfig;
use crate::hub::{BroadcastHub, IngestReport};
use crate::policy::{Assessment, HumidityPolicy};
use crate::types::DeviceStatus;

/// State shared by every request handler
pub struct AppState {
    /// The per-device broadcast hub
    pub hub: BroadcastHub,

    /// Thresholds applied to incoming readings
    pub policy: HumidityPolicy,

    /// Interval between SSE keep-alive comments
    pub keep_alive: Duration,
}

impl AppState {
    pub fn new(hub: BroadcastHub, policy: HumidityPolicy) -> Self {
        Self {
            hub,
            policy,
            keep_alive: Duration::from_secs(15),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            hub: BroadcastHub::with_config(config.hub),
            policy: config.policy,
            keep_alive: config.keep_alive,
        }
    }

    /// Evaluate a reading, record it as the device's latest status and fan it out
    pub fn ingest(&self, device_id: &str, humidity: f64, temperature: f64) -> (Assessment, IngestReport) {
        let assessment = self.policy.evaluate(humidity);
        let status = DeviceStatus::new(
            device_id,
            humidity,
            temperature,
            assessment.alert,
            assessment.message.clone(),
        );
        let report = self.hub.ingest(device_id, status);
        (assessment, report)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(BroadcastHub::new(), HumidityPolicy::default())
    }
}
