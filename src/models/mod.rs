//! Data structures for the team picker: players, rounds, rankings.

mod game;
mod player;
mod round;

pub use game::{Game, GameId};
pub use player::{Player, PlayerId, RankingRecord};
pub use round::{
    Captains, ErrorKind, GameError, Round, RoundPhase, Team, TeamMatch, ROSTER_SIZE, TEAM_SIZE,
};
