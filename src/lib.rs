//! Team fortune web app: library with models and wheel/round logic.

pub mod events;
pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    apply_round_result, confirm_pick, draw_captains, finalize_report, finish_spin, request_pick,
    resolve_winner, standings, start_round, SpinProgress, StandingEntry, WheelEngine,
    FLICK_VELOCITY_MIN, MAP_POOL, POINTER_ANGLE,
};
pub use models::{
    Captains, ErrorKind, Game, GameError, GameId, Player, PlayerId, RankingRecord, Round,
    RoundPhase, Team, TeamMatch, ROSTER_SIZE, TEAM_SIZE,
};
