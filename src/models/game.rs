//! Game: roster, active round, ranking, and match history.

use crate::models::player::{Player, PlayerId, RankingRecord};
use crate::models::round::{GameError, Round, TeamMatch};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a game session.
pub type GameId = Uuid;

/// Full game state: the editable roster, the live round, and cumulative
/// ranking data. Serialized whole as the read-only snapshot for rendering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Roster being edited between rounds (source of each round's snapshot).
    pub players: Vec<Player>,
    pub round: Round,
    /// Cumulative per-player statistics, keyed by player id.
    pub ranking: HashMap<PlayerId, RankingRecord>,
    /// Completed rounds, most recent last.
    pub history: Vec<TeamMatch>,
}

impl Game {
    /// Create a new game with an empty roster and no history.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            players: Vec::new(),
            round: Round::default(),
            ranking: HashMap::new(),
            history: Vec::new(),
        }
    }

    /// Create a game with previously persisted ranking and history.
    pub fn with_persisted(ranking: HashMap<PlayerId, RankingRecord>, history: Vec<TeamMatch>) -> Self {
        Self {
            ranking,
            history,
            ..Self::new()
        }
    }

    /// Add a player to the roster. Names must be non-empty and unique
    /// (case-insensitive). Blocked while a round is in progress.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<(), GameError> {
        if self.round.in_progress() {
            return Err(GameError::RoundInProgress);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(GameError::DuplicatePlayerName);
        }
        self.players.push(Player::new(name_trimmed));
        Ok(())
    }

    /// Remove a player by id. Blocked while a round is in progress.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        if self.round.in_progress() {
            return Err(GameError::RoundInProgress);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(GameError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
