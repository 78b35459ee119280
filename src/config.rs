//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds a feed entity lives after its last write
    pub entity_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// `max-age` in seconds advertised on feed responses
    pub feed_max_age: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ENTITY_TTL` - Entity time-to-live in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `FEED_MAX_AGE` - Feed `Cache-Control` max-age in seconds (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            entity_ttl: env_or("ENTITY_TTL", defaults.entity_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            feed_max_age: env_or("FEED_MAX_AGE", defaults.feed_max_age),
        }
    }

    pub fn entity_ttl(&self) -> Duration {
        Duration::from_secs(self.entity_ttl)
    }

    /// `Cache-Control` value for feed responses.
    pub fn feed_cache_control(&self) -> String {
        if self.feed_max_age == 0 {
            "no-cache".to_string()
        } else {
            format!("public, max-age={}", self.feed_max_age)
        }
    }
}

/// Parses `name` from the environment, falling back on absence or parse failure.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entity_ttl: 300,
            server_port: 3000,
            feed_max_age: 0,
        }
    }
}
