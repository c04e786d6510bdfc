//! Gateway configuration management

use anyhow::{anyhow, Context, Result};
use espn_fetcher::EspnConfig;
use roster_cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration for the League Gateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// ESPN league and client configuration
    pub espn: EspnConfig,

    /// Roster cache configuration
    pub cache: CacheSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Roster cache timing, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum snapshot age before a refresh is required
    pub ttl_secs: u64,

    /// Upper bound for one roster refresh
    pub refresh_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000 }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 300, refresh_timeout_secs: 10 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig::new(
            Duration::from_secs(self.ttl_secs),
            Duration::from_secs(self.refresh_timeout_secs),
        )
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file; missing sections keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Override fields from process environment variables
    pub fn load_from_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Override fields from any key/value lookup using the environment variable names
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GATEWAY_HOST") {
            self.server.host = host;
        }
        override_parsed(&lookup, "GATEWAY_PORT", &mut self.server.port)?;

        override_parsed(&lookup, "ESPN_LEAGUE_ID", &mut self.espn.league_id)?;
        override_parsed(&lookup, "ESPN_YEAR", &mut self.espn.year)?;
        if let Some(base_url) = lookup("ESPN_BASE_URL") {
            self.espn.base_url = base_url;
        }
        override_parsed(&lookup, "ESPN_REQUEST_TIMEOUT_SECS", &mut self.espn.request_timeout_secs)?;
        override_parsed(&lookup, "ESPN_HISTORY_SEASONS", &mut self.espn.history_seasons)?;
        override_parsed(&lookup, "ESPN_FREE_AGENT_MAX_SIZE", &mut self.espn.free_agent_max_size)?;

        override_parsed(&lookup, "ROSTER_CACHE_TTL_SECS", &mut self.cache.ttl_secs)?;
        override_parsed(
            &lookup,
            "ROSTER_REFRESH_TIMEOUT_SECS",
            &mut self.cache.refresh_timeout_secs,
        )?;

        if let Some(level) = lookup("GATEWAY_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        if let Some(format) = lookup("GATEWAY_LOG_FORMAT") {
            self.logging.format = format.to_lowercase();
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("Invalid server port: {}", self.server.port));
        }
        self.server.socket_addr()?;

        self.espn.validate().map_err(|e| anyhow!("Invalid ESPN configuration: {}", e))?;

        if self.cache.ttl_secs == 0 {
            return Err(anyhow!("cache.ttl_secs must be greater than 0"));
        }
        if self.cache.refresh_timeout_secs == 0 {
            return Err(anyhow!("cache.refresh_timeout_secs must be greater than 0"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(anyhow!("Invalid log level: {}", self.logging.level)),
        }
        match self.logging.format.as_str() {
            "json" | "pretty" => {}
            _ => return Err(anyhow!("Invalid log format: {}", self.logging.format)),
        }

        Ok(())
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid value {:?} for {}: {}", raw, key, e))?;
    }
    Ok(())
}

/// Load configuration: optional TOML file, then environment overrides, then validation
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            GatewayConfig::load_from_file(path)?
        }
        None => GatewayConfig::default(),
    };

    config.load_from_env()?;
    config.validate()?;

    Ok(config)
}
