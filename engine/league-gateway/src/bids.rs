//! In-memory bid board for free-agent pickups
//!
//! Bids live for the lifetime of the process. A team holds at most one bid
//! per player; a newer bid from the same team replaces the older one.

use crate::error::{GatewayError, GatewayResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fantasy team placing a bid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bidder {
    pub team_id: u32,
    pub name: String,
}

/// Offered contract terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub years: u32,
    pub salary: f64,
}

/// A stored bid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: String,
    pub player_id: i64,
    pub player_name: String,
    pub bidder: Bidder,
    pub contract: Contract,
    pub timestamp: i64,
}

/// Body of `POST /bids`; `id` and `timestamp` are filled in when absent
#[derive(Debug, Clone, Deserialize)]
pub struct BidRequest {
    pub id: Option<String>,
    pub player_id: i64,
    pub player_name: String,
    pub bidder: Bidder,
    pub contract: Contract,
    pub timestamp: Option<i64>,
}

impl BidRequest {
    pub fn validate(&self) -> GatewayResult<()> {
        if self.player_id <= 0 {
            return Err(GatewayError::InvalidBid(format!("invalid player id {}", self.player_id)));
        }
        if self.player_name.trim().is_empty() {
            return Err(GatewayError::InvalidBid("player_name is required".to_string()));
        }
        if self.bidder.name.trim().is_empty() {
            return Err(GatewayError::InvalidBid("bidder name is required".to_string()));
        }
        if self.contract.years == 0 {
            return Err(GatewayError::InvalidBid("contract years must be at least 1".to_string()));
        }
        if !self.contract.salary.is_finite() || self.contract.salary <= 0.0 {
            return Err(GatewayError::InvalidBid("contract salary must be positive".to_string()));
        }
        Ok(())
    }

    /// Finalize into a stored bid
    pub fn into_bid(self, now_millis: i64) -> Bid {
        Bid {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            player_id: self.player_id,
            player_name: self.player_name,
            bidder: self.bidder,
            contract: self.contract,
            timestamp: self.timestamp.unwrap_or(now_millis),
        }
    }
}

/// Process-local bid storage
#[derive(Debug, Default)]
pub struct BidStore {
    bids: RwLock<Vec<Bid>>,
}

impl BidStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.read().is_empty()
    }

    /// Store a bid, replacing the same team's earlier bid on the same player
    pub fn place(&self, bid: Bid) -> Bid {
        let mut bids = self.bids.write();
        bids.retain(|existing| {
            !(existing.player_id == bid.player_id && existing.bidder.team_id == bid.bidder.team_id)
        });
        bids.push(bid.clone());
        bid
    }

    /// Remove a bid by ID; false if no such bid exists
    pub fn remove(&self, id: &str) -> bool {
        let mut bids = self.bids.write();
        let before = bids.len();
        bids.retain(|bid| bid.id != id);
        bids.len() != before
    }

    /// Distinct players that currently have bids
    pub fn player_ids(&self) -> Vec<i64> {
        let ids: BTreeSet<i64> = self.bids.read().iter().map(|bid| bid.player_id).collect();
        ids.into_iter().collect()
    }

    /// Drop every bid on the given players, returning how many were removed
    pub fn remove_players(&self, player_ids: &[i64]) -> usize {
        if player_ids.is_empty() {
            return 0;
        }
        let mut bids = self.bids.write();
        let before = bids.len();
        bids.retain(|bid| !player_ids.contains(&bid.player_id));
        before - bids.len()
    }

    /// All bids ordered by bidder name, newest first within a bidder
    pub fn sorted(&self) -> Vec<Bid> {
        let mut bids = self.bids.read().clone();
        bids.sort_by(|a, b| {
            a.bidder.name.cmp(&b.bidder.name).then_with(|| b.timestamp.cmp(&a.timestamp))
        });
        bids
    }
}
