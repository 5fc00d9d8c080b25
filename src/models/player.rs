//! Player and RankingRecord data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in teams, rankings, and lookups).
pub type PlayerId = Uuid;

/// A player on the roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a new player with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Per-player cumulative statistics, persisted across rounds.
///
/// Created lazily on first participation. Win rate is derived, never stored.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub kills: u32,
    pub wins: u32,
    pub matches: u32,
}

impl RankingRecord {
    /// Record one played match with the given kill count.
    pub fn record_match(&mut self, kills: u32, won: bool) {
        self.matches += 1;
        self.kills += kills;
        if won {
            self.wins += 1;
        }
    }

    /// Fraction of played matches won, in [0, 1]. Zero when no matches played.
    pub fn win_rate(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.matches)
        }
    }
}
