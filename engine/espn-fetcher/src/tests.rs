//! Fetcher tests against a local stand-in for the ESPN API

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use roster_cache::{CacheConfig, RosterCache, RosterSource, SourceError};
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::Filter;

use crate::{EspnConfig, EspnFetcher, FetchError, Position};

const LEAGUE_ID: u32 = 3925;
const NOT_FOUND_LEAGUE: u32 = 404;
const PRIVATE_LEAGUE: u32 = 401;
const BROKEN_LEAGUE: u32 = 500;
const GARBLED_LEAGUE: u32 = 777;
const EMPTY_LEAGUE: u32 = 888;

fn player_json(id: i64, name: &str, position_id: u32, pro_team_id: u32, season: u16) -> Value {
    json!({
        "id": id,
        "fullName": name,
        "defaultPositionId": position_id,
        "proTeamId": pro_team_id,
        "injuryStatus": "ACTIVE",
        "stats": [
            {
                "seasonId": season, "scoringPeriodId": 0, "statSourceId": 0,
                "appliedTotal": 250.5, "appliedAverage": 14.5,
                "stats": { "3": 3500.0, "4": 28.0 }
            },
            {
                "seasonId": season, "scoringPeriodId": 0, "statSourceId": 1,
                "appliedTotal": 300.0, "appliedAverage": 17.5,
                "stats": { "3": 4000.0 }
            },
            {
                "seasonId": season, "scoringPeriodId": 5, "statSourceId": 0,
                "appliedTotal": 20.0, "stats": {}
            }
        ]
    })
}

fn roster_json(ids: &[i64]) -> Value {
    let entries: Vec<Value> = ids
        .iter()
        .map(|&id| {
            json!({
                "playerId": id,
                "lineupSlotId": 0,
                "playerPoolEntry": {
                    "onTeamId": 1,
                    "player": player_json(id, &format!("Player {id}"), 2, 12, 2025)
                }
            })
        })
        .collect();
    json!({ "entries": entries })
}

fn league_json() -> Value {
    json!({
        "id": LEAGUE_ID,
        "seasonId": 2025,
        "scoringPeriodId": 7,
        "teams": [
            {
                "id": 1, "abbrev": "GG", "name": "Gridiron Gurus",
                "record": { "overall": { "wins": 5, "losses": 2, "ties": 0,
                                         "pointsFor": 812.4, "pointsAgainst": 700.1 } },
                "roster": roster_json(&[1, 2, 3])
            },
            {
                "id": 2, "abbrev": "WWW", "location": "Waiver Wire", "nickname": "Warriors",
                "record": { "overall": { "wins": 3, "losses": 4 } },
                "roster": roster_json(&[4, 5])
            },
            {
                "id": 3, "abbrev": "BWB", "name": "Bye Week Blues",
                "roster": roster_json(&[6])
            }
        ]
    })
}

fn free_agent_pool() -> Vec<Value> {
    vec![
        json!({ "player": player_json(101, "Backup Quarterback", 1, 33, 2025) }),
        json!({ "player": player_json(102, "Handcuff Runner", 2, 12, 2025) }),
        json!({ "player": player_json(103, "Streaming Quarterback", 1, 2, 2025) }),
        json!({ "player": player_json(104, "Deep Threat", 3, 25, 2025) }),
    ]
}

fn reply(status: StatusCode, body: Value) -> warp::reply::Response {
    use warp::Reply;
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

fn league_reply(
    league_id: u32,
    query: Vec<(String, String)>,
    filter: Option<String>,
) -> warp::reply::Response {
    use warp::Reply;
    match league_id {
        NOT_FOUND_LEAGUE => return reply(StatusCode::NOT_FOUND, json!({ "messages": ["not found"] })),
        PRIVATE_LEAGUE => return reply(StatusCode::UNAUTHORIZED, json!({ "messages": ["private"] })),
        BROKEN_LEAGUE => return reply(StatusCode::INTERNAL_SERVER_ERROR, json!({})),
        GARBLED_LEAGUE => return "<html>maintenance</html>".into_response(),
        EMPTY_LEAGUE => return reply(StatusCode::OK, json!({ "id": EMPTY_LEAGUE, "teams": [] })),
        _ => {}
    }

    let views: Vec<&str> =
        query.iter().filter(|(k, _)| k == "view").map(|(_, v)| v.as_str()).collect();
    let filter: Value = filter.and_then(|f| serde_json::from_str(&f).ok()).unwrap_or(Value::Null);

    if views.contains(&"kona_player_info") {
        let slot = filter["players"]["filterSlotIds"]["value"][0].as_u64();
        let limit = filter["players"]["limit"].as_u64().unwrap_or(50) as usize;
        let players: Vec<Value> = free_agent_pool()
            .into_iter()
            .filter(|p| match slot {
                // QB slot 0 maps to defaultPositionId 1
                Some(0) => p["player"]["defaultPositionId"] == 1,
                Some(_) => false,
                None => true,
            })
            .take(limit)
            .collect();
        return reply(StatusCode::OK, json!({ "players": players }));
    }

    if views.contains(&"kona_playercard") {
        let wanted = filter["players"]["filterIds"]["value"][0].as_i64();
        let players: Vec<Value> = free_agent_pool()
            .into_iter()
            .filter(|p| p["player"]["id"].as_i64() == wanted)
            .collect();
        return reply(StatusCode::OK, json!({ "players": players }));
    }

    reply(StatusCode::OK, league_json())
}

fn players_reply(season: u16, filter: Option<String>) -> warp::reply::Response {
    if season < 2024 {
        return reply(StatusCode::NOT_FOUND, json!({ "messages": ["unknown season"] }));
    }
    let filter: Value = filter.and_then(|f| serde_json::from_str(&f).ok()).unwrap_or(Value::Null);
    let wanted = filter["players"]["filterIds"]["value"][0].as_i64().unwrap_or_default();
    reply(StatusCode::OK, json!([player_json(wanted, "Veteran Passer", 1, 33, season)]))
}

async fn spawn_mock_espn() -> SocketAddr {
    let league = warp::path!("ffl" / "seasons" / u16 / "segments" / u32 / "leagues" / u32)
        .and(warp::get())
        .and(warp::query::<Vec<(String, String)>>())
        .and(warp::header::optional::<String>("x-fantasy-filter"))
        .map(|_season: u16, _segment: u32, league_id: u32, query, filter| {
            league_reply(league_id, query, filter)
        });

    let players = warp::path!("ffl" / "seasons" / u16 / "players")
        .and(warp::get())
        .and(warp::header::optional::<String>("x-fantasy-filter"))
        .map(players_reply);

    let (addr, server) = warp::serve(league.or(players)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn fetcher_for(addr: SocketAddr, league_id: u32) -> EspnFetcher {
    let config = EspnConfig {
        league_id,
        year: 2025,
        base_url: format!("http://{addr}/ffl"),
        request_timeout_secs: 5,
        ..Default::default()
    };
    EspnFetcher::new(config).unwrap()
}

#[tokio::test]
async fn test_list_teams() {
    let addr = spawn_mock_espn().await;
    let fetcher = fetcher_for(addr, LEAGUE_ID);

    let teams = fetcher.list_teams().await.unwrap();
    assert_eq!(teams.len(), 3);

    assert_eq!(teams[0].team_name, "Gridiron Gurus");
    assert_eq!(teams[0].wins, 5);
    assert_eq!(teams[0].losses, 2);
    assert!((teams[0].points_for - 812.4).abs() < f64::EPSILON);
    assert_eq!(teams[0].roster.len(), 3);
    assert_eq!(teams[0].roster[0].position, "RB");
    assert_eq!(teams[0].roster[0].team, "KC");

    assert_eq!(teams[1].team_name, "Waiver Wire Warriors");
    assert_eq!(teams[2].wins, 0);
}

#[tokio::test]
async fn test_roster_source_unions_every_team() {
    let addr = spawn_mock_espn().await;
    let fetcher = fetcher_for(addr, LEAGUE_ID);

    let rosters = fetcher.list_team_rosters().await.unwrap();
    let ids: HashSet<i64> = rosters.iter().flat_map(|r| r.player_ids.iter().copied()).collect();
    assert_eq!(ids, (1..=6).collect());
}

#[tokio::test]
async fn test_roster_cache_over_fetcher() {
    let addr = spawn_mock_espn().await;
    let cache = RosterCache::new(Arc::new(fetcher_for(addr, LEAGUE_ID)), CacheConfig::default());

    assert!(cache.is_free_agent(7).await);
    assert!(!cache.is_free_agent(3).await);
    assert_eq!(cache.get_snapshot().await.unwrap().team_count(), 3);
    assert_eq!(cache.stats().upstream_calls(), 1);
}

#[tokio::test]
async fn test_free_agents_by_position() {
    let addr = spawn_mock_espn().await;
    let fetcher = fetcher_for(addr, LEAGUE_ID);

    let quarterbacks = fetcher.free_agents(Some(Position::QB), 10).await.unwrap();
    assert_eq!(quarterbacks.len(), 2);
    assert!(quarterbacks.iter().all(|p| p.position == "QB"));

    let first = &quarterbacks[0];
    assert_eq!(first.name, "Backup Quarterback");
    assert_eq!(first.team, "BAL");
    assert_eq!(first.total_points, 250.5);
    assert_eq!(first.projected_points, 300.0);
    assert_eq!(first.avg_points, 14.5);
    assert_eq!(first.projected_avg_points, 17.5);
    assert_eq!(first.status, "ACTIVE");
    assert_eq!(first.stats.breakdown.get("passingYards"), Some(&3500.0));
    assert_eq!(first.stats.projected_breakdown.get("passingYards"), Some(&4000.0));

    let top_two = fetcher.free_agents(None, 2).await.unwrap();
    assert_eq!(top_two.len(), 2);
}

#[tokio::test]
async fn test_player_info() {
    let addr = spawn_mock_espn().await;
    let fetcher = fetcher_for(addr, LEAGUE_ID);

    let player = fetcher.player_info(104).await.unwrap().unwrap();
    assert_eq!(player.name, "Deep Threat");
    assert_eq!(player.position, "WR");

    assert!(fetcher.player_info(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_free_agent_size_is_capped() {
    let addr = spawn_mock_espn().await;
    let config = EspnConfig {
        league_id: LEAGUE_ID,
        base_url: format!("http://{addr}/ffl"),
        free_agent_page_size: 2,
        free_agent_max_size: 3,
        ..Default::default()
    };
    let fetcher = EspnFetcher::new(config).unwrap();

    let players = fetcher.free_agents(None, 1_000).await.unwrap();
    assert_eq!(players.len(), 3);
}

#[tokio::test]
async fn test_player_history_skips_unknown_seasons() {
    let addr = spawn_mock_espn().await;
    let fetcher = fetcher_for(addr, LEAGUE_ID);

    let history = fetcher.player_history(3_139_477).await.unwrap();
    let years: Vec<u16> = history.iter().map(|s| s.year).collect();
    assert_eq!(years, vec![2025, 2024]);
    assert_eq!(history[0].stats.get("passingTouchdowns"), Some(&28.0));
    assert_eq!(history[1].total_points, 250.5);
    assert_eq!(history[1].avg_points, 14.5);
}

#[tokio::test]
async fn test_error_mapping() {
    let addr = spawn_mock_espn().await;

    let err = fetcher_for(addr, NOT_FOUND_LEAGUE).list_teams().await.unwrap_err();
    assert!(matches!(err, FetchError::LeagueNotFound { league_id: NOT_FOUND_LEAGUE, year: 2025 }));
    assert!(err.is_configuration());

    let err = fetcher_for(addr, PRIVATE_LEAGUE).list_teams().await.unwrap_err();
    assert!(matches!(err, FetchError::Unauthorized { league_id: PRIVATE_LEAGUE }));

    let err = fetcher_for(addr, BROKEN_LEAGUE).list_teams().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert!(!err.is_configuration());

    let err = fetcher_for(addr, GARBLED_LEAGUE).list_teams().await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed { .. }));

    let err = fetcher_for(addr, EMPTY_LEAGUE).list_teams().await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed { .. }));
}

#[tokio::test]
async fn test_roster_source_error_kinds() {
    let addr = spawn_mock_espn().await;

    let err = fetcher_for(addr, NOT_FOUND_LEAGUE).list_team_rosters().await.unwrap_err();
    assert_eq!(err, SourceError::LeagueNotFound { league_id: NOT_FOUND_LEAGUE, year: 2025 });

    let err = fetcher_for(addr, BROKEN_LEAGUE).list_team_rosters().await.unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 500, .. }));

    let unreachable = EspnConfig {
        base_url: "http://127.0.0.1:1/ffl".to_string(),
        request_timeout_secs: 2,
        ..Default::default()
    };
    let err = EspnFetcher::new(unreachable).unwrap().list_team_rosters().await.unwrap_err();
    assert!(matches!(err, SourceError::Transport(_)));
}

#[test]
fn test_config_urls() {
    let config = EspnConfig::default();
    assert_eq!(
        config.league_url(),
        "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl/seasons/2025/segments/0/leagues/3925"
    );
    assert_eq!(config.history_years(), vec![2025, 2024, 2023]);
    assert!(config.validate().is_ok());

    let config = EspnConfig { year: 2010, ..Default::default() };
    assert!(config.validate().is_err());

    let config = EspnConfig { free_agent_max_size: 5, ..Default::default() };
    assert!(config.validate().is_err());
}
