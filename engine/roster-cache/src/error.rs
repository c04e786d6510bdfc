//! Error types for the RosterCache

use thiserror::Error;

/// Failures reported by a roster source while enumerating team rosters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    #[error("League {league_id} season {year} does not exist")]
    LeagueNotFound { league_id: u32, year: u16 },

    #[error("League {league_id} cannot be accessed without session cookies")]
    Unauthorized { league_id: u32 },
}

/// Errors surfaced by the RosterCache when a refresh fails
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Network failure, timeout, malformed body or non-success status
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// League or season does not exist, or is not accessible
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl CacheError {
    /// Create a new upstream unavailable error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::UpstreamUnavailable(_) => "upstream_unavailable",
            CacheError::InvalidConfiguration(_) => "invalid_configuration",
        }
    }
}

impl From<SourceError> for CacheError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::LeagueNotFound { .. } | SourceError::Unauthorized { .. } => {
                CacheError::InvalidConfiguration(err.to_string())
            }
            SourceError::Transport(_) | SourceError::Status { .. } | SourceError::Malformed(_) => {
                CacheError::UpstreamUnavailable(err.to_string())
            }
        }
    }
}
