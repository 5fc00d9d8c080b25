//! Round state machine data and GameError.

use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Players per team; rounds are always 4v4 over a roster of 8.
pub const TEAM_SIZE: usize = 4;

/// Roster size required to start a round.
pub const ROSTER_SIZE: usize = 2 * TEAM_SIZE;

/// Broad classification of a [`GameError`], for callers that only care
/// whether the input was bad, the timing was bad, or an invariant broke.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
    LogicError,
}

/// Errors that can occur during game operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameError {
    /// Roster must hold exactly 8 players to start a round.
    WrongRosterSize { required: usize, actual: usize },
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player name is empty after trimming.
    EmptyPlayerName,
    /// Player not found on the roster.
    PlayerNotFound(PlayerId),
    /// Report submitted without a winning team selected.
    WinningTeamUnset,
    /// The wheel is already spinning; a second spin cannot start.
    SpinInProgress,
    /// The wheel is not spinning; there is nothing to finish.
    NotSpinning,
    /// No candidates to spin over (pool empty or round complete).
    NoCandidates,
    /// A round is already in progress; the operation must wait for it to end.
    RoundInProgress,
    /// Operation requires a completed round (e.g. captain draw, report).
    RoundNotComplete,
    /// The previous winner has not been confirmed yet.
    PendingWinnerUnconfirmed,
    /// There is no resolved winner waiting for confirmation.
    NoPendingWinner,
    /// Captains were already drawn for this round.
    CaptainsAlreadyDrawn,
    /// Resolved winner is not a member of the candidate pool. Internal
    /// invariant violation; unreachable under correct sequencing.
    WinnerNotInPool(PlayerId),
    /// Team assembly left the wrong number of players for team B. Internal
    /// invariant violation; unreachable under correct sequencing.
    UnevenSplit { remaining: usize },
    /// Wheel resolved an index outside the candidate pool. Internal
    /// invariant violation; unreachable under correct sequencing.
    WinnerIndexOutOfRange { index: usize, pool: usize },
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        use GameError::*;
        match self {
            WrongRosterSize { .. } | DuplicatePlayerName | EmptyPlayerName | PlayerNotFound(_)
            | WinningTeamUnset => ErrorKind::InvalidArgument,
            SpinInProgress | NotSpinning | NoCandidates | RoundInProgress | RoundNotComplete
            | PendingWinnerUnconfirmed | NoPendingWinner | CaptainsAlreadyDrawn => {
                ErrorKind::InvalidState
            }
            WinnerNotInPool(_) | UnevenSplit { .. } | WinnerIndexOutOfRange { .. } => {
                ErrorKind::LogicError
            }
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::WrongRosterSize { required, actual } => {
                write!(f, "Need exactly {} players to start a round (have {})", required, actual)
            }
            GameError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            GameError::EmptyPlayerName => write!(f, "Player name cannot be empty"),
            GameError::PlayerNotFound(_) => write!(f, "Player not found"),
            GameError::WinningTeamUnset => write!(f, "Select a winning team before saving the report"),
            GameError::SpinInProgress => write!(f, "The wheel is already spinning"),
            GameError::NotSpinning => write!(f, "The wheel is not spinning"),
            GameError::NoCandidates => write!(f, "No players left to pick"),
            GameError::RoundInProgress => write!(f, "A round is in progress"),
            GameError::RoundNotComplete => write!(f, "The round is not complete yet"),
            GameError::PendingWinnerUnconfirmed => write!(f, "Confirm the current pick first"),
            GameError::NoPendingWinner => write!(f, "No pick waiting for confirmation"),
            GameError::CaptainsAlreadyDrawn => write!(f, "Captains were already drawn"),
            GameError::WinnerNotInPool(_) => write!(f, "Winner is not in the candidate pool"),
            GameError::UnevenSplit { remaining } => {
                write!(f, "Team split left {} players for team B instead of {}", remaining, TEAM_SIZE)
            }
            GameError::WinnerIndexOutOfRange { index, pool } => {
                write!(f, "Wheel resolved index {} outside the pool of {}", index, pool)
            }
        }
    }
}

/// Which team won the round.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    A,
    B,
}

/// Current phase of the round state machine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// No active round.
    #[default]
    Idle,
    /// Picks remaining; team A still filling up.
    PoolActive,
    /// Both teams populated (4 each).
    RoundComplete,
    /// Captains selected on top of a complete round.
    CaptainsDrawn,
}

/// One captain per team, drawn after the round completes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Captains {
    pub team_a: Player,
    pub team_b: Player,
}

/// History entry for one completed round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamMatch {
    pub timestamp: DateTime<Utc>,
    pub map: Option<String>,
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
}

/// Live round state: roster snapshot, candidate pool, teams, and pick progress.
///
/// Invariants: `team_a.len() + team_b.len() + pool.len() == roster.len()`,
/// `team_a.len() <= TEAM_SIZE`, and the round is complete iff team A is full,
/// at which point team B holds the remaining four players and the pool is empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Round {
    /// Roster snapshot taken at round start (8 players).
    pub roster: Vec<Player>,
    /// Players still eligible for selection. Order is stable between draws:
    /// it determines each candidate's slice on the wheel.
    pub pool: Vec<Player>,
    pub team_a: Vec<Player>,
    pub team_b: Vec<Player>,
    /// Confirmed picks so far (equals `team_a.len()`).
    pub picks: u32,
    pub phase: RoundPhase,
    /// Most recent wheel result, not yet confirmed into team A.
    pub pending_winner: Option<Player>,
    pub captains: Option<Captains>,
    /// Map label drawn at round start.
    pub current_map: Option<String>,
}

impl Round {
    /// True while picks are still being made and roster edits must be blocked.
    pub fn in_progress(&self) -> bool {
        self.phase == RoundPhase::PoolActive
    }

    /// True once team A is full and team B has been assigned.
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, RoundPhase::RoundComplete | RoundPhase::CaptainsDrawn)
    }
}
