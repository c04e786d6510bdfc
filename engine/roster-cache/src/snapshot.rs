//! Immutable point-in-time capture of roster membership

use crate::source::TeamRoster;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Every player ID rostered by any team in the league at `fetched_at_millis`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    player_ids: HashSet<i64>,
    fetched_at_millis: i64,
    team_count: usize,
}

impl RosterSnapshot {
    /// Build a snapshot from a complete scan of the league's team rosters
    pub fn from_teams(teams: &[TeamRoster], fetched_at_millis: i64) -> Self {
        let player_ids: HashSet<i64> =
            teams.iter().flat_map(|team| team.player_ids.iter().copied()).collect();

        Self { player_ids, fetched_at_millis, team_count: teams.len() }
    }

    pub fn player_ids(&self) -> &HashSet<i64> {
        &self.player_ids
    }

    pub fn fetched_at_millis(&self) -> i64 {
        self.fetched_at_millis
    }

    pub fn team_count(&self) -> usize {
        self.team_count
    }

    pub fn len(&self) -> usize {
        self.player_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.player_ids.is_empty()
    }

    pub fn contains(&self, player_id: i64) -> bool {
        self.player_ids.contains(&player_id)
    }

    /// Player IDs in ascending order, for stable API output
    pub fn sorted_player_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.player_ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Age of the snapshot relative to `now_millis` (zero if the clock went backwards)
    pub fn age_millis(&self, now_millis: i64) -> u64 {
        now_millis.saturating_sub(self.fetched_at_millis).max(0) as u64
    }

    pub fn is_expired(&self, now_millis: i64, ttl: Duration) -> bool {
        is_expired(now_millis, self.fetched_at_millis, ttl)
    }
}

/// A snapshot is expired once its age strictly exceeds the TTL
pub fn is_expired(now_millis: i64, fetched_at_millis: i64, ttl: Duration) -> bool {
    let age = i128::from(now_millis) - i128::from(fetched_at_millis);
    age > ttl.as_millis() as i128
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(300_000);

    #[test]
    fn test_expiry_boundaries() {
        let t0 = 1_700_000_000_000;
        assert!(!is_expired(t0, t0, TTL));
        assert!(!is_expired(t0 + 299_999, t0, TTL));
        assert!(!is_expired(t0 + 300_000, t0, TTL));
        assert!(is_expired(t0 + 300_001, t0, TTL));
    }

    #[test]
    fn test_clock_skew_is_not_expired() {
        let t0 = 1_700_000_000_000;
        assert!(!is_expired(t0 - 5_000, t0, TTL));
    }

    #[test]
    fn test_from_teams_unions_rosters() {
        let teams = vec![
            TeamRoster::new(1, "Alpha", vec![1, 2, 3]),
            TeamRoster::new(2, "Bravo", vec![4, 5]),
            TeamRoster::new(3, "Charlie", vec![6, 3]),
        ];

        let snapshot = RosterSnapshot::from_teams(&teams, 42);
        assert_eq!(snapshot.sorted_player_ids(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(snapshot.team_count(), 3);
        assert_eq!(snapshot.fetched_at_millis(), 42);
        assert_eq!(snapshot.age_millis(1_042), 1_000);
    }
}
