//! Upstream roster source abstraction

use crate::error::SourceError;
use serde::{Deserialize, Serialize};

/// One team's roster as reported by the league data provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team_id: u32,
    pub team_name: String,
    pub player_ids: Vec<i64>,
}

impl TeamRoster {
    pub fn new(team_id: u32, team_name: impl Into<String>, player_ids: Vec<i64>) -> Self {
        Self { team_id, team_name: team_name.into(), player_ids }
    }
}

/// Enumerates every team roster of a configured league season.
///
/// Implementations must return either every team or an error. A partial list
/// would be published as a complete snapshot.
#[async_trait::async_trait]
pub trait RosterSource: Send + Sync {
    async fn list_team_rosters(&self) -> Result<Vec<TeamRoster>, SourceError>;
}
