//! REST API endpoints for the League Gateway
//!
//! Pass-through endpoints read straight from ESPN for the configured league
//! season. Free-agent status, roster snapshot and bid endpoints answer from
//! the roster membership cache.

use crate::bids::{Bid, BidRequest, BidStore};
use crate::error::{reject, ApiRejection, ErrorResponse, GatewayError};
use espn_fetcher::{EspnFetcher, Position, YearlyStats};
use roster_cache::{
    AnswerSource, CacheStats, ClassificationError, MembershipStatus, RosterCache, RosterSnapshot,
    SnapshotLookup,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::info;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Largest accepted bid body
const MAX_BID_BODY_BYTES: u64 = 16 * 1024;

/// Free-agent listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct FreeAgentParams {
    pub size: Option<usize>,
}

/// Player stat history response
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerHistoryResponse {
    pub player_id: i64,
    pub seasons: Vec<YearlyStats>,
}

/// Roster snapshot response
#[derive(Debug, Serialize, Deserialize)]
pub struct RosterSnapshotResponse {
    pub player_ids: Vec<i64>,
    pub total: usize,
    pub team_count: usize,
    pub fetched_at_millis: Option<i64>,
    pub source: AnswerSource,
    pub error: Option<ClassificationError>,
}

impl From<&SnapshotLookup> for RosterSnapshotResponse {
    fn from(lookup: &SnapshotLookup) -> Self {
        let snapshot = lookup.snapshot.as_deref();
        Self {
            player_ids: snapshot.map(RosterSnapshot::sorted_player_ids).unwrap_or_default(),
            total: snapshot.map(RosterSnapshot::len).unwrap_or(0),
            team_count: snapshot.map(RosterSnapshot::team_count).unwrap_or(0),
            fetched_at_millis: snapshot.map(RosterSnapshot::fetched_at_millis),
            source: lookup.source,
            error: lookup.error.as_ref().map(ClassificationError::from),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub roster_cache: CacheStats,
}

/// Bid deletion query parameters
#[derive(Debug, Default, Deserialize)]
pub struct DeleteBidParams {
    pub id: Option<String>,
}

/// Accepted bid response
#[derive(Debug, Serialize, Deserialize)]
pub struct BidResponse {
    pub success: bool,
    pub bid: Bid,
}

/// All teams with records and rosters
pub async fn get_teams(fetcher: Arc<EspnFetcher>) -> Result<impl Reply, Rejection> {
    let teams = fetcher.list_teams().await.map_err(reject)?;
    Ok(warp::reply::json(&teams))
}

/// Free agents, optionally restricted to one position
pub async fn get_free_agents(
    position: Option<Position>,
    params: FreeAgentParams,
    fetcher: Arc<EspnFetcher>,
) -> Result<impl Reply, Rejection> {
    let size = params.size.unwrap_or(fetcher.config().free_agent_page_size);
    let players = fetcher.free_agents(position, size).await.map_err(reject)?;
    Ok(warp::reply::json(&players))
}

/// Free agents for a position given as a path segment
pub async fn get_free_agents_by_position(
    position: String,
    params: FreeAgentParams,
    fetcher: Arc<EspnFetcher>,
) -> Result<impl Reply, Rejection> {
    let position = position
        .parse::<Position>()
        .map_err(|_| reject(GatewayError::InvalidPosition(position.clone())))?;
    get_free_agents(Some(position), params, fetcher).await
}

/// Player card for one player
pub async fn get_player_info(
    player_id: i64,
    fetcher: Arc<EspnFetcher>,
) -> Result<impl Reply, Rejection> {
    match fetcher.player_info(player_id).await.map_err(reject)? {
        Some(player) => Ok(warp::reply::json(&player)),
        None => Err(reject(GatewayError::PlayerNotFound(player_id))),
    }
}

/// Season totals for recent seasons, newest first
pub async fn get_player_history(
    player_id: i64,
    fetcher: Arc<EspnFetcher>,
) -> Result<impl Reply, Rejection> {
    let seasons = fetcher.player_history(player_id).await.map_err(reject)?;
    Ok(warp::reply::json(&PlayerHistoryResponse { player_id, seasons }))
}

/// Tri-state free-agent classification; degraded answers are still 200
pub async fn get_free_agent_status(
    player_id: i64,
    cache: Arc<RosterCache>,
) -> Result<impl Reply, Rejection> {
    let classification = cache.classify(player_id).await;
    tracing::debug!(
        "Player {} classified as {:?} ({:?})",
        player_id,
        classification.status,
        classification.source
    );
    Ok(warp::reply::json(&classification))
}

/// Current roster snapshot, refreshing it first if expired
pub async fn get_roster_snapshot(cache: Arc<RosterCache>) -> Result<impl Reply, Rejection> {
    let lookup = cache.lookup().await;
    Ok(warp::reply::json(&RosterSnapshotResponse::from(&lookup)))
}

/// Force a roster refresh regardless of snapshot age
pub async fn refresh_roster_snapshot(cache: Arc<RosterCache>) -> Result<impl Reply, Rejection> {
    let snapshot = cache.refresh().await.map_err(reject)?;
    let lookup =
        SnapshotLookup { snapshot: Some(snapshot), source: AnswerSource::Fresh, error: None };
    Ok(warp::reply::json(&RosterSnapshotResponse::from(&lookup)))
}

/// Service health plus roster cache counters
pub async fn get_health(cache: Arc<RosterCache>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        roster_cache: cache.stats(),
    }))
}

/// Accept a bid only when the cache shows the player as a free agent
pub async fn place_bid(
    request: BidRequest,
    cache: Arc<RosterCache>,
    bids: Arc<BidStore>,
) -> Result<impl Reply, Rejection> {
    request.validate().map_err(reject)?;

    let player_id = request.player_id;
    let classification = cache.classify(player_id).await;
    if !classification.is_determined() {
        let (kind, reason) = classification
            .error
            .map(|e| (e.kind, e.message))
            .unwrap_or_else(|| ("upstream_unavailable".to_string(), "no roster data".to_string()));
        return Err(reject(GatewayError::AvailabilityUnknown { player_id, kind, reason }));
    }
    if !classification.is_free_agent() {
        return Err(reject(GatewayError::PlayerUnavailable { player_id }));
    }

    let bid = bids.place(request.into_bid(chrono::Utc::now().timestamp_millis()));
    info!(
        "Bid {} placed by {} on player {} ({} years, {})",
        bid.id, bid.bidder.name, bid.player_id, bid.contract.years, bid.contract.salary
    );

    Ok(warp::reply::with_status(
        warp::reply::json(&BidResponse { success: true, bid }),
        StatusCode::CREATED,
    ))
}

/// All bids, after dropping bids on players that are now rostered.
///
/// Bids on players the cache cannot classify are kept until a snapshot is
/// available again.
pub async fn list_bids(
    cache: Arc<RosterCache>,
    bids: Arc<BidStore>,
) -> Result<impl Reply, Rejection> {
    let player_ids = bids.player_ids();
    if !player_ids.is_empty() {
        let taken: Vec<i64> = cache
            .classify_many(&player_ids)
            .await
            .into_iter()
            .filter(|c| c.status == MembershipStatus::Rostered)
            .map(|c| c.player_id)
            .collect();
        let removed = bids.remove_players(&taken);
        if removed > 0 {
            info!("Removed {} bids on players who are no longer free agents", removed);
        }
    }

    Ok(warp::reply::json(&bids.sorted()))
}

/// Withdraw a bid by ID
pub async fn delete_bid(
    params: DeleteBidParams,
    bids: Arc<BidStore>,
) -> Result<impl Reply, Rejection> {
    let id = params
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| reject(GatewayError::InvalidBid("Bid ID required".to_string())))?;

    if !bids.remove(&id) {
        return Err(reject(GatewayError::BidNotFound(id)));
    }
    info!("Bid {} withdrawn", id);
    Ok(warp::reply::json(&serde_json::json!({ "success": true })))
}

/// Matches `/free-agents-{pos}` for the legacy per-position routes
fn legacy_position() -> impl Filter<Extract = (Position,), Error = Rejection> + Clone {
    warp::path::param::<String>().and_then(|segment: String| async move {
        segment
            .strip_prefix("free-agents-")
            .and_then(|pos| pos.parse::<Position>().ok())
            .filter(|pos| Position::LEGACY_ROUTES.contains(pos))
            .ok_or_else(warp::reject::not_found)
    })
}

/// Render every rejection as the JSON error envelope
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if let Some(api) = err.find::<ApiRejection>() {
        (api.status, api.body.clone())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorResponse::new("NOT_FOUND", "Route not found", None))
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, ErrorResponse::new("INVALID_QUERY", e.to_string(), None))
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, ErrorResponse::new("INVALID_BODY", e.to_string(), None))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorResponse::new("PAYLOAD_TOO_LARGE", "Request body too large", None),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorResponse::new("METHOD_NOT_ALLOWED", "Method not allowed", None),
        )
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL_ERROR", "Internal server error", None),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

/// Create all REST API routes
pub fn create_routes(
    fetcher: Arc<EspnFetcher>,
    cache: Arc<RosterCache>,
    bids: Arc<BidStore>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let fetcher_filter = warp::any().map(move || fetcher.clone());
    let cache_filter = warp::any().map(move || cache.clone());
    let bids_filter = warp::any().map(move || bids.clone());

    let teams = warp::path("teams")
        .and(warp::path::end())
        .and(warp::get())
        .and(fetcher_filter.clone())
        .and_then(get_teams);

    let free_agents = warp::path("free-agents")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<FreeAgentParams>())
        .and(fetcher_filter.clone())
        .and_then(|params: FreeAgentParams, fetcher: Arc<EspnFetcher>| async move {
            get_free_agents(None, params, fetcher).await
        });

    let free_agents_by_position = warp::path!("free-agents" / String)
        .and(warp::get())
        .and(warp::query::<FreeAgentParams>())
        .and(fetcher_filter.clone())
        .and_then(get_free_agents_by_position);

    let legacy_free_agents = legacy_position()
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<FreeAgentParams>())
        .and(fetcher_filter.clone())
        .and_then(
            |position: Position, params: FreeAgentParams, fetcher: Arc<EspnFetcher>| async move {
                get_free_agents(Some(position), params, fetcher).await
            },
        );

    let player_info = warp::path!("playerinfo" / i64)
        .and(warp::get())
        .and(fetcher_filter.clone())
        .and_then(get_player_info);

    let player_history = warp::path!("player-stats" / i64)
        .and(warp::get())
        .and(fetcher_filter)
        .and_then(get_player_history);

    let free_agent_status = warp::path!("player-free-agent-status" / i64)
        .and(warp::get())
        .and(cache_filter.clone())
        .and_then(get_free_agent_status);

    let roster_snapshot = warp::path!("roster-snapshot")
        .and(warp::get())
        .and(cache_filter.clone())
        .and_then(get_roster_snapshot);

    let refresh_snapshot = warp::path!("roster-snapshot" / "refresh")
        .and(warp::post())
        .and(cache_filter.clone())
        .and_then(refresh_roster_snapshot);

    let create_bid = warp::path!("bids")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BID_BODY_BYTES))
        .and(warp::body::json::<BidRequest>())
        .and(cache_filter.clone())
        .and(bids_filter.clone())
        .and_then(place_bid);

    let all_bids = warp::path!("bids")
        .and(warp::get())
        .and(cache_filter.clone())
        .and(bids_filter.clone())
        .and_then(list_bids);

    let withdraw_bid = warp::path!("bids")
        .and(warp::delete())
        .and(warp::query::<DeleteBidParams>())
        .and(bids_filter)
        .and_then(delete_bid);

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(cache_filter)
        .and_then(get_health);

    teams
        .or(free_agents)
        .or(free_agents_by_position)
        .or(player_info)
        .or(player_history)
        .or(free_agent_status)
        .or(roster_snapshot)
        .or(refresh_snapshot)
        .or(create_bid)
        .or(all_bids)
        .or(withdraw_bid)
        .or(health)
        .or(legacy_free_agents)
        .recover(handle_rejection)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "DELETE", "OPTIONS"]),
        )
}
