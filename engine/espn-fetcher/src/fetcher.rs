use crate::config::EspnConfig;
use crate::error::{FetchError, FetchResult};
use crate::models::*;
use crate::positions::Position;
use reqwest::{Client, StatusCode};
use roster_cache::{RosterSource, SourceError, TeamRoster};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Header carrying ESPN's JSON player filter
const FANTASY_FILTER_HEADER: &str = "x-fantasy-filter";

/// Whether a request targets the configured league or the global player pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    League,
    Players,
}

/// ESPN fantasy league client for one league season
pub struct EspnFetcher {
    config: EspnConfig,
    client: Client,
}

impl EspnFetcher {
    /// Create a new fetcher instance
    pub fn new(config: EspnConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("league-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &EspnConfig {
        &self.config
    }

    /// GET a JSON document, mapping ESPN status codes to fetch errors
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        filter: Option<&Value>,
        scope: Scope,
    ) -> FetchResult<T> {
        debug!("Fetching {} {:?}", url, query);

        let mut request = self.client.get(url).query(query);
        if let Some(filter) = filter {
            request = request.header(FANTASY_FILTER_HEADER, filter.to_string());
        }

        let response =
            request.send().await.map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match (scope, status) {
                (Scope::League, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                    FetchError::Unauthorized { league_id: self.config.league_id }
                }
                (Scope::League, StatusCode::NOT_FOUND) => FetchError::LeagueNotFound {
                    league_id: self.config.league_id,
                    year: self.config.year,
                },
                _ => FetchError::Status { status: status.as_u16(), url: url.to_string() },
            });
        }

        let body = response.text().await.map_err(|e| FetchError::from_reqwest(url, e))?;
        serde_json::from_str(&body)
            .map_err(|e| FetchError::Malformed { url: url.to_string(), message: e.to_string() })
    }

    /// Fetch the league document with the given views
    pub async fn fetch_league(&self, views: &[&str]) -> FetchResult<LeagueResponse> {
        let query: Vec<(&str, String)> = views.iter().map(|v| ("view", v.to_string())).collect();
        let url = self.config.league_url();
        let league: LeagueResponse = self.get_json(&url, &query, None, Scope::League).await?;

        if league.teams.is_empty() {
            return Err(FetchError::Malformed { url, message: "league has no teams".to_string() });
        }
        Ok(league)
    }

    /// All teams with records and rosters
    pub async fn list_teams(&self) -> FetchResult<Vec<Team>> {
        let league = self.fetch_league(&["mTeam", "mRoster"]).await?;
        let teams: Vec<Team> =
            league.teams.iter().map(|team| team.to_team(self.config.year)).collect();

        info!("Fetched {} teams for league {}", teams.len(), self.config.league_id);
        Ok(teams)
    }

    /// Free agents and waiver players, most owned first
    pub async fn free_agents(
        &self,
        position: Option<Position>,
        size: usize,
    ) -> FetchResult<Vec<PlayerSummary>> {
        let size = size.min(self.config.free_agent_max_size);
        let mut players = json!({
            "filterStatus": { "value": ["FREEAGENT", "WAIVERS"] },
            "limit": size,
            "sortPercOwned": { "sortPriority": 1, "sortAsc": false },
            "sortDraftRanks": { "sortPriority": 100, "sortAsc": true, "value": "STANDARD" }
        });
        if let Some(position) = position {
            players["filterSlotIds"] = json!({ "value": [position.slot_id()] });
        }
        let filter = json!({ "players": players });

        let query = [("view", "kona_player_info".to_string())];
        let response: PlayersResponse =
            self.get_json(&self.config.league_url(), &query, Some(&filter), Scope::League).await?;

        let agents: Vec<PlayerSummary> = response
            .players
            .iter()
            .take(size)
            .map(|entry| entry.player.to_summary(self.config.year))
            .collect();

        info!(
            "Fetched {} free agents (position: {})",
            agents.len(),
            position.map(|p| p.as_str()).unwrap_or("ALL")
        );
        Ok(agents)
    }

    fn player_card_filter(player_id: i64, season: u16) -> Value {
        json!({
            "players": {
                "filterIds": { "value": [player_id] },
                "filterStatsForTopScoringPeriodIds": {
                    "value": 17,
                    "additionalValue": [format!("00{season}"), format!("10{season}")]
                }
            }
        })
    }

    /// Player card for one player in the configured league season
    pub async fn player_info(&self, player_id: i64) -> FetchResult<Option<PlayerSummary>> {
        let filter = Self::player_card_filter(player_id, self.config.year);
        let query = [("view", "kona_playercard".to_string())];
        let response: PlayersResponse =
            self.get_json(&self.config.league_url(), &query, Some(&filter), Scope::League).await?;

        Ok(response
            .players
            .iter()
            .find(|entry| entry.player.id == player_id)
            .map(|entry| entry.player.to_summary(self.config.year)))
    }

    /// Season totals for the configured number of recent seasons, newest first.
    ///
    /// Seasons with no data (or that ESPN does not know) are skipped; any
    /// other failure aborts the whole history.
    pub async fn player_history(&self, player_id: i64) -> FetchResult<Vec<YearlyStats>> {
        let mut history = Vec::new();

        for season in self.config.history_years() {
            let url = self.config.players_url(season);
            let filter = Self::player_card_filter(player_id, season);
            let query = [("view", "kona_playercard".to_string())];

            // The season player endpoint returns a bare array of players
            let players: Vec<EspnPlayer> =
                match self.get_json(&url, &query, Some(&filter), Scope::Players).await {
                    Ok(players) => players,
                    Err(FetchError::Status { status: 404, .. }) => {
                        warn!("No {} season data for player {}", season, player_id);
                        continue;
                    }
                    Err(e) => return Err(e),
                };

            if let Some(stats) = players
                .iter()
                .find(|player| player.id == player_id)
                .and_then(|player| player.to_yearly_stats(season))
            {
                history.push(stats);
            }
        }

        Ok(history)
    }
}

#[async_trait::async_trait]
impl RosterSource for EspnFetcher {
    async fn list_team_rosters(&self) -> Result<Vec<TeamRoster>, SourceError> {
        let league = self.fetch_league(&["mRoster"]).await?;
        Ok(league.teams.iter().map(EspnTeam::to_team_roster).collect())
    }
}
