//! Tri-state free-agent classification results

use crate::error::CacheError;
use serde::{Deserialize, Serialize};

/// Whether a player is on a roster, as far as the cache can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    FreeAgent,
    Rostered,
    /// No snapshot could be obtained; callers must not treat this as a free agent
    Undetermined,
}

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Snapshot within TTL
    Fresh,
    /// Expired snapshot kept after a failed refresh
    Stale,
    /// No snapshot at all, fail-safe answer
    Default,
}

/// Refresh failure attached to a degraded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationError {
    pub kind: String,
    pub message: String,
}

impl From<&CacheError> for ClassificationError {
    fn from(err: &CacheError) -> Self {
        Self { kind: err.kind().to_string(), message: err.to_string() }
    }
}

/// Answer to "is player P a free agent?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub player_id: i64,
    pub is_free_agent: bool,
    pub status: MembershipStatus,
    pub source: AnswerSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ClassificationError>,
}

impl Classification {
    pub fn new(
        player_id: i64,
        status: MembershipStatus,
        source: AnswerSource,
        error: Option<&CacheError>,
    ) -> Self {
        Self {
            player_id,
            is_free_agent: status == MembershipStatus::FreeAgent,
            status,
            source,
            error: error.map(ClassificationError::from),
        }
    }

    /// True only when a snapshot positively shows the player is unrostered
    pub fn is_free_agent(&self) -> bool {
        self.is_free_agent
    }

    pub fn is_determined(&self) -> bool {
        self.status != MembershipStatus::Undetermined
    }
}
