//! Game logic: wheel engine, round coordination, ranking.

mod ranking;
mod round_flow;
mod wheel;

pub use ranking::{apply_round_result, standings, StandingEntry};
pub use round_flow::{
    confirm_pick, draw_captains, finalize_report, finish_spin, request_pick, start_round, MAP_POOL,
};
pub use wheel::{resolve_winner, SpinProgress, WheelEngine, FLICK_VELOCITY_MIN, POINTER_ANGLE};
