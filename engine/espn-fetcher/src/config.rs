use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base path for ESPN Fantasy Football v3 API
pub const DEFAULT_BASE_URL: &str = "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl";

/// Configuration for the ESPN fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EspnConfig {
    /// Fantasy league ID
    pub league_id: u32,

    /// Season year (e.g., 2025)
    pub year: u16,

    /// API base URL, overridable for testing
    pub base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Number of seasons (including the current one) returned by player history
    pub history_seasons: u16,

    /// Default page size for free-agent listings
    pub free_agent_page_size: usize,

    /// Upper bound on any requested free-agent page size
    pub free_agent_max_size: usize,
}

impl Default for EspnConfig {
    fn default() -> Self {
        Self {
            league_id: 3925,
            year: 2025,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            history_seasons: 3,
            free_agent_page_size: 10,
            free_agent_max_size: 50,
        }
    }
}

impl EspnConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// League endpoint for the configured season
    pub fn league_url(&self) -> String {
        format!(
            "{}/seasons/{}/segments/0/leagues/{}",
            self.base_url.trim_end_matches('/'),
            self.year,
            self.league_id
        )
    }

    /// League-independent player endpoint for a season
    pub fn players_url(&self, season: u16) -> String {
        format!("{}/seasons/{}/players", self.base_url.trim_end_matches('/'), season)
    }

    /// Seasons covered by player history, newest first
    pub fn history_years(&self) -> Vec<u16> {
        (0..self.history_seasons).filter_map(|offset| self.year.checked_sub(offset)).collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.league_id == 0 {
            return Err("league_id must be set".to_string());
        }
        if self.year < 2018 {
            return Err(format!("season {} predates the v3 league API", self.year));
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.history_seasons == 0 {
            return Err("history_seasons must be greater than 0".to_string());
        }
        if self.free_agent_page_size == 0 {
            return Err("free_agent_page_size must be greater than 0".to_string());
        }
        if self.free_agent_max_size < self.free_agent_page_size {
            return Err(format!(
                "free_agent_max_size ({}) is smaller than free_agent_page_size ({})",
                self.free_agent_max_size, self.free_agent_page_size
            ));
        }
        Ok(())
    }
}
