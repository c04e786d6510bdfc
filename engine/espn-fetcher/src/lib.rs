//! ESPN Fetcher
//!
//! Reads league data for one fantasy football league season from the ESPN
//! fantasy API: teams and rosters, free agents by position, player cards and
//! multi-season stat history. The fetcher also serves as the roster source
//! behind the roster membership cache.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod positions;

#[cfg(test)]
mod tests;

pub use config::EspnConfig;
pub use error::{FetchError, FetchResult};
pub use fetcher::EspnFetcher;
pub use models::*;
pub use positions::Position;
