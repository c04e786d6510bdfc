use crate::positions::{position_name, pro_team_abbrev, stat_name};
use roster_cache::TeamRoster;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// ESPN league payload (`mTeam`, `mRoster` views)
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeagueResponse {
    pub id: Option<u32>,
    pub season_id: Option<u16>,
    pub scoring_period_id: Option<u32>,
    #[serde(default)]
    pub teams: Vec<EspnTeam>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EspnTeam {
    pub id: u32,
    pub abbrev: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub nickname: Option<String>,
    pub record: Option<EspnRecord>,
    pub roster: Option<EspnRoster>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnRecord {
    #[serde(default)]
    pub overall: EspnRecordLine,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EspnRecordLine {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EspnRoster {
    #[serde(default)]
    pub entries: Vec<EspnRosterEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EspnRosterEntry {
    pub player_id: i64,
    pub lineup_slot_id: Option<u32>,
    pub player_pool_entry: Option<EspnPlayerPoolEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EspnPlayerPoolEntry {
    pub on_team_id: Option<u32>,
    pub player: EspnPlayer,
}

/// ESPN player-list payload (`kona_player_info`, `kona_playercard` views)
#[derive(Debug, Deserialize, Clone)]
pub struct PlayersResponse {
    #[serde(default)]
    pub players: Vec<EspnPlayerPoolEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EspnPlayer {
    pub id: i64,
    #[serde(default)]
    pub full_name: String,
    pub default_position_id: Option<u32>,
    pub pro_team_id: Option<u32>,
    pub injury_status: Option<String>,
    #[serde(default)]
    pub stats: Vec<EspnStatLine>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EspnStatLine {
    pub season_id: Option<u16>,
    pub scoring_period_id: Option<u32>,
    /// 0 = actual, 1 = projected
    pub stat_source_id: Option<u32>,
    pub applied_total: Option<f64>,
    pub applied_average: Option<f64>,
    #[serde(default)]
    pub stats: HashMap<String, f64>,
}

/// Fantasy team row returned by `/teams`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Team {
    pub team_id: u32,
    pub team_name: String,
    pub abbrev: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
    pub roster: Vec<PlayerSummary>,
}

/// Season stat breakdowns keyed by stat name
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub breakdown: BTreeMap<String, f64>,
    pub projected_breakdown: BTreeMap<String, f64>,
}

/// Flat player shape shared by every player endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerSummary {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub team: String,
    pub projected_points: f64,
    pub total_points: f64,
    pub avg_points: f64,
    pub projected_avg_points: f64,
    pub status: String,
    pub stats: PlayerStats,
}

/// One season of a player's stat history
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct YearlyStats {
    pub year: u16,
    pub total_points: f64,
    pub avg_points: f64,
    pub stats: BTreeMap<String, f64>,
}

/// Source of a stat line
const ACTUAL: u32 = 0;
const PROJECTED: u32 = 1;

impl EspnPlayer {
    /// Season-total line for `season` from the given source
    fn season_line(&self, season: u16, source: u32) -> Option<&EspnStatLine> {
        self.stats.iter().find(|line| {
            line.season_id == Some(season)
                && line.scoring_period_id == Some(0)
                && line.stat_source_id == Some(source)
        })
    }

    /// Flatten into the API player shape for `season`
    pub fn to_summary(&self, season: u16) -> PlayerSummary {
        let actual = self.season_line(season, ACTUAL);
        let projected = self.season_line(season, PROJECTED);

        PlayerSummary {
            id: self.id,
            name: self.full_name.clone(),
            position: self
                .default_position_id
                .map(position_name)
                .unwrap_or("Unknown Position")
                .to_string(),
            team: pro_team_abbrev(self.pro_team_id.unwrap_or(0)).to_string(),
            projected_points: projected.and_then(|l| l.applied_total).unwrap_or(0.0),
            total_points: actual.and_then(|l| l.applied_total).unwrap_or(0.0),
            avg_points: actual.and_then(|l| l.applied_average).unwrap_or(0.0),
            projected_avg_points: projected.and_then(|l| l.applied_average).unwrap_or(0.0),
            status: self.injury_status.clone().unwrap_or_else(|| "ACTIVE".to_string()),
            stats: PlayerStats {
                breakdown: actual.map(named_stats).unwrap_or_default(),
                projected_breakdown: projected.map(named_stats).unwrap_or_default(),
            },
        }
    }

    /// Actual season totals for `season`, if ESPN has any
    pub fn to_yearly_stats(&self, season: u16) -> Option<YearlyStats> {
        self.season_line(season, ACTUAL).map(|line| YearlyStats {
            year: season,
            total_points: line.applied_total.unwrap_or(0.0),
            avg_points: line.applied_average.unwrap_or(0.0),
            stats: named_stats(line),
        })
    }
}

fn named_stats(line: &EspnStatLine) -> BTreeMap<String, f64> {
    line.stats.iter().map(|(id, value)| (stat_name(id).to_string(), *value)).collect()
}

impl EspnTeam {
    /// Display name; older seasons split it into location and nickname
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_ref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        let joined = format!(
            "{} {}",
            self.location.as_deref().unwrap_or_default(),
            self.nickname.as_deref().unwrap_or_default()
        );
        let joined = joined.trim();
        if joined.is_empty() {
            format!("Team {}", self.id)
        } else {
            joined.to_string()
        }
    }

    pub fn player_ids(&self) -> Vec<i64> {
        self.roster
            .as_ref()
            .map(|roster| roster.entries.iter().map(|entry| entry.player_id).collect())
            .unwrap_or_default()
    }

    pub fn to_team(&self, season: u16) -> Team {
        let record = self.record.as_ref().map(|r| r.overall.clone()).unwrap_or_default();
        let roster = self
            .roster
            .as_ref()
            .map(|roster| {
                roster
                    .entries
                    .iter()
                    .filter_map(|entry| entry.player_pool_entry.as_ref())
                    .map(|pool| pool.player.to_summary(season))
                    .collect()
            })
            .unwrap_or_default();

        Team {
            team_id: self.id,
            team_name: self.display_name(),
            abbrev: self.abbrev.clone(),
            wins: record.wins,
            losses: record.losses,
            ties: record.ties,
            points_for: record.points_for,
            points_against: record.points_against,
            roster,
        }
    }

    pub fn to_team_roster(&self) -> TeamRoster {
        TeamRoster::new(self.id, self.display_name(), self.player_ids())
    }
}
