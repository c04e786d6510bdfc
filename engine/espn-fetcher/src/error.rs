//! Error types for the ESPN fetcher

use roster_cache::SourceError;
use thiserror::Error;

/// Result type alias for fetcher operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while talking to ESPN
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("League {league_id} season {year} does not exist")]
    LeagueNotFound { league_id: u32, year: u16 },

    #[error("League {league_id} cannot be accessed without session cookies")]
    Unauthorized { league_id: u32 },

    #[error("ESPN returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response from {url}: {message}")]
    Malformed { url: String, message: String },
}

impl FetchError {
    /// True for errors caused by league configuration rather than the network
    pub fn is_configuration(&self) -> bool {
        matches!(self, FetchError::LeagueNotFound { .. } | FetchError::Unauthorized { .. })
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout { url: url.to_string() }
        } else if err.is_decode() {
            FetchError::Malformed { url: url.to_string(), message: err.to_string() }
        } else {
            FetchError::Transport { url: url.to_string(), message: err.to_string() }
        }
    }
}

impl From<FetchError> for SourceError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::LeagueNotFound { league_id, year } => {
                SourceError::LeagueNotFound { league_id, year }
            }
            FetchError::Unauthorized { league_id } => SourceError::Unauthorized { league_id },
            FetchError::Status { status, url } => SourceError::Status { status, message: url },
            FetchError::Malformed { url, message } => {
                SourceError::Malformed(format!("{url}: {message}"))
            }
            other @ (FetchError::Client(_)
            | FetchError::Transport { .. }
            | FetchError::Timeout { .. }) => SourceError::Transport(other.to_string()),
        }
    }
}
