//! # League Gateway
//!
//! HTTP facade over one ESPN fantasy league season. Pass-through endpoints
//! expose teams, free agents, player cards and stat history; the
//! free-agent status endpoints answer from the shared roster membership
//! cache and always report how fresh the answer is. The bid board accepts
//! bids only on players the cache shows as free agents.

pub mod bids;
pub mod config;
pub mod error;
pub mod logging;
pub mod rest_api;
pub mod signals;


pub use bids::{Bid, BidRequest, BidStore, Bidder, Contract};
pub use config::{load_config, CacheSettings, GatewayConfig, LoggingConfig, ServerConfig};
pub use error::{ApiRejection, ErrorDetail, ErrorResponse, GatewayError, GatewayResult};
pub use logging::initialize_logging;
pub use rest_api::create_routes;
pub use signals::shutdown_signal;

/// Current version of the League Gateway
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
