//! # RosterCache
//!
//! Holds the set of player IDs currently rostered by any team in a league
//! season and classifies arbitrary player IDs as free agents or rostered.
//!
//! The cache refreshes lazily: the first caller to observe an expired (or
//! absent) snapshot rebuilds it from the league's team rosters while other
//! callers wait on the same refresh. A failed refresh never clears good data,
//! and every answer reports whether it came from a fresh snapshot, a stale one
//! or the fail-safe default.

pub mod cache;
pub mod classification;
pub mod clock;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod source;


pub use cache::{CacheStats, RosterCache, SnapshotLookup};
pub use classification::{AnswerSource, Classification, ClassificationError, MembershipStatus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, SourceError};
pub use snapshot::{is_expired, RosterSnapshot};
pub use source::{RosterSource, TeamRoster};

/// Current version of the RosterCache
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default snapshot time-to-live (5 minutes)
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;

/// Default upper bound for one upstream roster enumeration
pub const DEFAULT_REFRESH_TIMEOUT_MS: u64 = 10_000;
