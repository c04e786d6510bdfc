//! Core RosterCache implementation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classification::{AnswerSource, Classification, MembershipStatus};
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::snapshot::RosterSnapshot;
use crate::source::RosterSource;

/// Lazily refreshed roster membership cache for one league season.
///
/// The current snapshot lives behind a single `Arc` that is replaced as a
/// unit, so readers see either the previous snapshot or the new one. Refreshes
/// are serialised: callers that queue behind an in-flight refresh reuse its
/// outcome instead of issuing their own upstream call.
pub struct RosterCache {
    source: Arc<dyn RosterSource>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,

    current: RwLock<Option<Arc<RosterSnapshot>>>,
    refresh_lock: tokio::sync::Mutex<()>,

    // Outcome of the most recent refresh attempt
    attempts: AtomicU64,
    last_error: Mutex<Option<CacheError>>,

    hits: AtomicU64,
    coalesced: AtomicU64,
    refreshes: AtomicU64,
    refresh_failures: AtomicU64,
}

/// Snapshot chosen for answering a query, with its provenance
#[derive(Debug, Clone)]
pub struct SnapshotLookup {
    pub snapshot: Option<Arc<RosterSnapshot>>,
    pub source: AnswerSource,
    pub error: Option<CacheError>,
}

impl SnapshotLookup {
    /// Classify a player against this lookup
    pub fn classify(&self, player_id: i64) -> Classification {
        let status = match &self.snapshot {
            Some(snapshot) if snapshot.contains(player_id) => MembershipStatus::Rostered,
            Some(_) => MembershipStatus::FreeAgent,
            None => MembershipStatus::Undetermined,
        };
        Classification::new(player_id, status, self.source, self.error.as_ref())
    }
}

/// Counters describing cache behaviour since startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Requests answered from a snapshot within TTL
    pub hits: u64,
    /// Requests that waited on another caller's refresh and reused its outcome
    pub coalesced: u64,
    /// Successful refreshes
    pub refreshes: u64,
    /// Failed refreshes
    pub refresh_failures: u64,
}

impl CacheStats {
    /// Number of upstream roster enumerations issued
    pub fn upstream_calls(&self) -> u64 {
        self.refreshes + self.refresh_failures
    }
}

impl RosterCache {
    /// Create a new cache backed by the system clock
    pub fn new(source: Arc<dyn RosterSource>, config: CacheConfig) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), config)
    }

    /// Create a new cache with an explicit clock
    pub fn with_clock(
        source: Arc<dyn RosterSource>,
        clock: Arc<dyn Clock>,
        config: CacheConfig,
    ) -> Self {
        Self {
            source,
            clock,
            config,
            current: RwLock::new(None),
            refresh_lock: tokio::sync::Mutex::new(()),
            attempts: AtomicU64::new(0),
            last_error: Mutex::new(None),
            hits: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
            refresh_failures: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Current snapshot regardless of age, without touching the upstream source
    pub fn current(&self) -> Option<Arc<RosterSnapshot>> {
        self.current.read().clone()
    }

    /// Current snapshot if it is still within TTL
    fn fresh(&self) -> Option<Arc<RosterSnapshot>> {
        let now = self.clock.now_millis();
        self.current().filter(|snapshot| !snapshot.is_expired(now, self.config.ttl()))
    }

    /// Return a snapshot no older than the TTL, refreshing if needed
    pub async fn get_snapshot(&self) -> Result<Arc<RosterSnapshot>, CacheError> {
        if let Some(snapshot) = self.fresh() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Roster cache hit ({} players)", snapshot.len());
            return Ok(snapshot);
        }

        let observed_attempts = self.attempts.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;

        // Another caller may have finished a refresh while we waited
        if let Some(snapshot) = self.fresh() {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
            return Ok(snapshot);
        }
        if self.attempts.load(Ordering::Acquire) != observed_attempts {
            let last_error = self.last_error.lock().clone();
            if let Some(err) = last_error {
                self.coalesced.fetch_add(1, Ordering::Relaxed);
                return Err(err);
            }
        }

        self.refresh_locked().await
    }

    /// Refresh unconditionally, ignoring the age of the current snapshot
    pub async fn refresh(&self) -> Result<Arc<RosterSnapshot>, CacheError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    // Caller must hold `refresh_lock`
    async fn refresh_locked(&self) -> Result<Arc<RosterSnapshot>, CacheError> {
        let started = Instant::now();
        let timeout = self.config.refresh_timeout();

        let outcome =
            match tokio::time::timeout(timeout, self.source.list_team_rosters()).await {
                Ok(Ok(teams)) => {
                    let snapshot =
                        Arc::new(RosterSnapshot::from_teams(&teams, self.clock.now_millis()));
                    *self.current.write() = Some(Arc::clone(&snapshot));
                    Ok(snapshot)
                }
                Ok(Err(e)) => Err(CacheError::from(e)),
                Err(_) => Err(CacheError::upstream(format!(
                    "roster enumeration timed out after {}ms",
                    timeout.as_millis()
                ))),
            };

        match &outcome {
            Ok(snapshot) => {
                self.refreshes.fetch_add(1, Ordering::Relaxed);
                *self.last_error.lock() = None;
                info!(
                    "Roster snapshot refreshed: {} players across {} teams in {:?}",
                    snapshot.len(),
                    snapshot.team_count(),
                    started.elapsed()
                );
            }
            Err(e) => {
                self.refresh_failures.fetch_add(1, Ordering::Relaxed);
                *self.last_error.lock() = Some(e.clone());
                warn!("Roster refresh failed after {:?}: {}", started.elapsed(), e);
            }
        }
        self.attempts.fetch_add(1, Ordering::Release);

        outcome
    }

    /// Pick the snapshot a classification should use, degrading on failure
    pub async fn lookup(&self) -> SnapshotLookup {
        match self.get_snapshot().await {
            Ok(snapshot) => {
                SnapshotLookup { snapshot: Some(snapshot), source: AnswerSource::Fresh, error: None }
            }
            Err(err) => self.degrade(err),
        }
    }

    /// Best available answer after a failed refresh.
    ///
    /// A concurrent refresh may have published a new snapshot since ours
    /// failed; that snapshot is fresh and carries no error.
    pub(crate) fn degrade(&self, err: CacheError) -> SnapshotLookup {
        let now = self.clock.now_millis();
        match self.current() {
            Some(snapshot) if !snapshot.is_expired(now, self.config.ttl()) => {
                debug!("Refresh failed but a fresh snapshot was published meanwhile: {}", err);
                SnapshotLookup { snapshot: Some(snapshot), source: AnswerSource::Fresh, error: None }
            }
            Some(stale) => {
                warn!(
                    "Answering from stale roster snapshot ({}ms old): {}",
                    stale.age_millis(now),
                    err
                );
                SnapshotLookup { snapshot: Some(stale), source: AnswerSource::Stale, error: Some(err) }
            }
            None => {
                warn!("No roster snapshot available, using fail-safe default: {}", err);
                SnapshotLookup { snapshot: None, source: AnswerSource::Default, error: Some(err) }
            }
        }
    }

    /// Classify a player as free agent, rostered or undetermined
    pub async fn classify(&self, player_id: i64) -> Classification {
        self.lookup().await.classify(player_id)
    }

    /// Classify several players against one snapshot
    pub async fn classify_many(&self, player_ids: &[i64]) -> Vec<Classification> {
        let lookup = self.lookup().await;
        player_ids.iter().map(|&id| lookup.classify(id)).collect()
    }

    /// True only when a snapshot shows the player on no roster
    pub async fn is_free_agent(&self, player_id: i64) -> bool {
        self.classify(player_id).await.is_free_agent()
    }

    /// Logical negation of `is_free_agent`; undetermined players count as rostered
    pub async fn is_rostered(&self, player_id: i64) -> bool {
        !self.is_free_agent(player_id).await
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            refresh_failures: self.refresh_failures.load(Ordering::Relaxed),
        }
    }
}
