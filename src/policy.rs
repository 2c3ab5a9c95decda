//! Humidity threshold policy

pub const DEFAULT_LOW_HUMIDITY: f64 = 40.0;
pub const DEFAULT_HIGH_HUMIDITY: f64 = 60.0;

pub const MESSAGE_TOO_LOW: &str = "Humidity is too low. Please humidify.";
pub const MESSAGE_TOO_HIGH: &str = "Humidity is too high. Reduce humidity.";
pub const MESSAGE_NORMAL: &str = "Humidity is normal.";

/// Result of evaluating one reading
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub alert: bool,
    pub message: String,
}

/// Comfortable humidity band; readings outside it raise an alert
///
/// Both bounds count as normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumidityPolicy {
    pub low: f64,
    pub high: f64,
}

impl Default for HumidityPolicy {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_HUMIDITY,
            high: DEFAULT_HIGH_HUMIDITY,
        }
    }
}

impl HumidityPolicy {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn evaluate(&self, humidity: f64) -> Assessment {
        let (alert, message) = if humidity < self.low {
            (true, MESSAGE_TOO_LOW)
        } else if humidity > self.high {
            (true, MESSAGE_TOO_HIGH)
        } else {
            (false, MESSAGE_NORMAL)
        };

        Assessment {
            alert,
            message: message.to_string(),
        }
    }
}
