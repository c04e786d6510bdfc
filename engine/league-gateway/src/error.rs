//! Error types for the League Gateway

use espn_fetcher::FetchError;
use roster_cache::{CacheError, MembershipStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warp::http::StatusCode;

/// Errors that can occur while serving a request
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Unknown position: {0}")]
    InvalidPosition(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(i64),

    #[error("Invalid bid: {0}")]
    InvalidBid(String),

    #[error("Bid not found: {0}")]
    BidNotFound(String),

    #[error("Player {player_id} is no longer available")]
    PlayerUnavailable { player_id: i64 },

    #[error("Availability of player {player_id} cannot be verified: {reason}")]
    AvailabilityUnknown { player_id: i64, kind: String, reason: String },
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Fetch(FetchError::Client(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Fetch(e) if e.is_configuration() => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Fetch(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Cache(CacheError::InvalidConfiguration(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            GatewayError::Cache(CacheError::UpstreamUnavailable(_)) => StatusCode::BAD_GATEWAY,
            GatewayError::InvalidPosition(_) | GatewayError::InvalidBid(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::PlayerNotFound(_) | GatewayError::BidNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::PlayerUnavailable { .. } => StatusCode::CONFLICT,
            GatewayError::AvailabilityUnknown { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Machine-readable error code for the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Fetch(FetchError::Client(_)) => "INTERNAL_ERROR",
            GatewayError::Fetch(e) if e.is_configuration() => "INVALID_CONFIGURATION",
            GatewayError::Fetch(_) => "UPSTREAM_UNAVAILABLE",
            GatewayError::Cache(CacheError::InvalidConfiguration(_)) => "INVALID_CONFIGURATION",
            GatewayError::Cache(CacheError::UpstreamUnavailable(_)) => "UPSTREAM_UNAVAILABLE",
            GatewayError::InvalidPosition(_) => "INVALID_POSITION",
            GatewayError::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
            GatewayError::InvalidBid(_) => "INVALID_BID",
            GatewayError::BidNotFound(_) => "BID_NOT_FOUND",
            GatewayError::PlayerUnavailable { .. } => "PLAYER_UNAVAILABLE",
            GatewayError::AvailabilityUnknown { .. } => "AVAILABILITY_UNKNOWN",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            GatewayError::Cache(e) => Some(serde_json::json!({ "kind": e.kind() })),
            GatewayError::InvalidPosition(_) => Some(serde_json::json!({
                "supported": ["QB", "RB", "WR", "TE", "DT", "DE", "LB", "CB", "S", "K", "D/ST"]
            })),
            GatewayError::PlayerUnavailable { player_id } => Some(serde_json::json!({
                "player_id": player_id,
                "status": MembershipStatus::Rostered,
            })),
            GatewayError::AvailabilityUnknown { player_id, kind, .. } => Some(serde_json::json!({
                "player_id": player_id,
                "status": MembershipStatus::Undetermined,
                "kind": kind,
            })),
            _ => None,
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error: ErrorDetail { code: code.to_string(), message: message.into(), details },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Rejection carrying a rendered error envelope and its HTTP status
#[derive(Debug)]
pub struct ApiRejection {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl warp::reject::Reject for ApiRejection {}

impl From<GatewayError> for ApiRejection {
    fn from(err: GatewayError) -> Self {
        Self {
            status: err.status_code(),
            body: ErrorResponse::new(err.code(), err.to_string(), err.details()),
        }
    }
}

/// Convert a gateway error into a warp rejection
pub fn reject(err: impl Into<GatewayError>) -> warp::Rejection {
    warp::reject::custom(ApiRejection::from(err.into()))
}
