//! League Gateway server
//!
//! Serves league data and free-agent classification for one ESPN fantasy
//! league season until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use espn_fetcher::EspnFetcher;
use league_gateway::{
    create_routes, initialize_logging, load_config, shutdown_signal, BidStore, VERSION,
};
use roster_cache::RosterCache;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "league-gateway", version, about = "HTTP gateway for an ESPN fantasy league")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    info!("Starting League Gateway v{}", VERSION);
    info!(
        "League {} season {}, roster cache TTL {}s",
        config.espn.league_id, config.espn.year, config.cache.ttl_secs
    );

    let fetcher =
        Arc::new(EspnFetcher::new(config.espn.clone()).context("Failed to create ESPN client")?);
    let cache = Arc::new(RosterCache::new(fetcher.clone(), config.cache.to_cache_config()));

    let bids = Arc::new(BidStore::new());

    let routes = create_routes(fetcher, cache, bids);
    let addr = config.server.socket_addr()?;

    let (bound, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("League Gateway listening on http://{}", bound);
    server.await;

    info!("League Gateway shutdown complete");
    Ok(())
}
