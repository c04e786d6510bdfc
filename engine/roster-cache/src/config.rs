//! Configuration for the RosterCache

use crate::{DEFAULT_REFRESH_TIMEOUT_MS, DEFAULT_TTL_MS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the RosterCache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum snapshot age in milliseconds before a refresh is required
    pub ttl_ms: u64,

    /// Upper bound for one upstream roster enumeration in milliseconds
    pub refresh_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_ms: DEFAULT_TTL_MS, refresh_timeout_ms: DEFAULT_REFRESH_TIMEOUT_MS }
    }
}

impl CacheConfig {
    /// Build a config from durations
    pub fn new(ttl: Duration, refresh_timeout: Duration) -> Self {
        Self {
            ttl_ms: ttl.as_millis() as u64,
            refresh_timeout_ms: refresh_timeout.as_millis() as u64,
        }
    }

    /// Get the TTL as a Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Get the refresh timeout as a Duration
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_ms == 0 {
            return Err("ttl_ms must be greater than 0".to_string());
        }
        if self.refresh_timeout_ms == 0 {
            return Err("refresh_timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}
