//! Server configuration from environment variables

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::hub::{HubConfig, DEFAULT_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY};
use crate::policy::HumidityPolicy;

/// Errors raised while reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("HUMIDITY_LOW ({low}) must not exceed HUMIDITY_HIGH ({high})")]
    InvertedThresholds { low: f64, high: f64 },
}

/// Everything the server needs to start
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub policy: HumidityPolicy,
    pub hub: HubConfig,
    pub keep_alive: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            policy: HumidityPolicy::default(),
            hub: HubConfig::default(),
            keep_alive: Duration::from_secs(15),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    ///
    /// Environment:
    /// - HOST: bind address (default 0.0.0.0)
    /// - PORT: listen port (default 8080)
    /// - HUMIDITY_LOW / HUMIDITY_HIGH: alert thresholds (default 40 / 60)
    /// - SUBSCRIBER_BUFFER: per-subscriber queue size (default 10, at most 65536)
    /// - SUBSCRIBER_MAX_DROPS: consecutive drops before eviction (default: never)
    /// - SSE_KEEP_ALIVE_SECS: keep-alive interval for streams (default 15)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = parse_or(&lookup, "HOST", defaults.host)?;
        let port = parse_or(&lookup, "PORT", defaults.port)?;

        let low = parse_or(&lookup, "HUMIDITY_LOW", defaults.policy.low)?;
        let high = parse_or(&lookup, "HUMIDITY_HIGH", defaults.policy.high)?;
        finite("HUMIDITY_LOW", low)?;
        finite("HUMIDITY_HIGH", high)?;
        if low > high {
            return Err(ConfigError::InvertedThresholds { low, high });
        }

        let channel_capacity = parse_or(&lookup, "SUBSCRIBER_BUFFER", DEFAULT_CHANNEL_CAPACITY)?;
        non_zero("SUBSCRIBER_BUFFER", channel_capacity as u64)?;
        if channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(ConfigError::Invalid {
                var: "SUBSCRIBER_BUFFER",
                value: channel_capacity.to_string(),
                reason: format!("must be at most {MAX_CHANNEL_CAPACITY}"),
            });
        }

        let max_consecutive_drops = match lookup("SUBSCRIBER_MAX_DROPS") {
            Some(raw) => {
                let limit: u32 = parse_value("SUBSCRIBER_MAX_DROPS", &raw)?;
                non_zero("SUBSCRIBER_MAX_DROPS", limit as u64)?;
                Some(limit)
            }
            None => None,
        };

        let keep_alive_secs = parse_or(&lookup, "SSE_KEEP_ALIVE_SECS", defaults.keep_alive.as_secs())?;
        non_zero("SSE_KEEP_ALIVE_SECS", keep_alive_secs)?;

        Ok(Self {
            host,
            port,
            policy: HumidityPolicy::new(low, high),
            hub: HubConfig {
                channel_capacity,
                max_consecutive_drops,
            },
            keep_alive: Duration::from_secs(keep_alive_secs),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => parse_value(var, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn non_zero(var: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn finite(var: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.hub.channel_capacity, 10);
        assert_eq!(config.hub.max_consecutive_drops, None);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("HUMIDITY_LOW", "35"),
            ("HUMIDITY_HIGH", "65.5"),
            ("SUBSCRIBER_BUFFER", "32"),
            ("SUBSCRIBER_MAX_DROPS", "100"),
            ("SSE_KEEP_ALIVE_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.policy, HumidityPolicy::new(35.0, 65.5));
        assert_eq!(config.hub.channel_capacity, 32);
        assert_eq!(config.hub.max_consecutive_drops, Some(100));
        assert_eq!(config.keep_alive, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn test_inverted_thresholds() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("HUMIDITY_LOW", "70"),
            ("HUMIDITY_HIGH", "60"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedThresholds { .. }));
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("SUBSCRIBER_BUFFER", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SUBSCRIBER_BUFFER", .. }));
    }

    #[test]
    fn test_huge_buffer_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("SUBSCRIBER_BUFFER", "18446744073709551615")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SUBSCRIBER_BUFFER", .. }));

        let config = ServerConfig::from_lookup(lookup(&[("SUBSCRIBER_BUFFER", "65536")])).unwrap();
        assert_eq!(config.hub.channel_capacity, MAX_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("HUMIDITY_LOW", "NaN")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HUMIDITY_LOW", .. }));

        let err = ServerConfig::from_lookup(lookup(&[("HUMIDITY_HIGH", "NaN")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HUMIDITY_HIGH", .. }));

        let err = ServerConfig::from_lookup(lookup(&[("HUMIDITY_HIGH", "inf")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HUMIDITY_HIGH", .. }));
    }
}
