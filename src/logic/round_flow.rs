//! Round coordinator: consumes wheel winners to assemble two teams of four.

use crate::events::{CommentarySink, CueSink};
use crate::logic::ranking::apply_round_result;
use crate::logic::wheel::{SpinProgress, WheelEngine};
use crate::models::{
    Captains, Game, GameError, Player, PlayerId, Round, RoundPhase, Team, TeamMatch, ROSTER_SIZE,
    TEAM_SIZE,
};
use crate::storage::{KeyValueStore, HISTORY_KEY, RANKING_KEY};
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Map labels drawn uniformly at round start.
pub const MAP_POOL: [&str; 8] = [
    "Rust",
    "Shipment",
    "Shoot House",
    "Nuketown",
    "Highrise",
    "Terminal",
    "Favela",
    "Scrapyard",
];

/// Start a new round from the current roster (must be exactly 8 players).
///
/// Resets the pool to a roster snapshot, clears both teams, draws a map
/// label, and notifies the commentary sink.
pub fn start_round(
    game: &mut Game,
    rng: &mut impl Rng,
    commentary: &impl CommentarySink,
) -> Result<(), GameError> {
    if game.round.in_progress() {
        return Err(GameError::RoundInProgress);
    }
    if game.players.len() != ROSTER_SIZE {
        return Err(GameError::WrongRosterSize {
            required: ROSTER_SIZE,
            actual: game.players.len(),
        });
    }
    game.round = Round {
        roster: game.players.clone(),
        pool: game.players.clone(),
        phase: RoundPhase::PoolActive,
        current_map: MAP_POOL.choose(rng).map(|m| (*m).to_string()),
        ..Round::default()
    };
    commentary.round_started();
    Ok(())
}

/// Request the next pick: spins the wheel over the live pool.
///
/// Fails while the pool is empty, the round is complete, or the previous
/// winner has not been confirmed yet.
pub fn request_pick(
    game: &Game,
    wheel: &mut WheelEngine,
    flick_velocity: Option<f64>,
    rng: &mut impl Rng,
    cues: &impl CueSink,
) -> Result<(), GameError> {
    if game.round.pending_winner.is_some() {
        return Err(GameError::PendingWinnerUnconfirmed);
    }
    if game.round.is_complete() || game.round.pool.is_empty() {
        return Err(GameError::NoCandidates);
    }
    wheel.begin_spin(game.round.pool.len(), flick_velocity, rng, cues)
}

/// Drive the in-flight spin to its end and stage the resolved player as the
/// round's pending winner. The name goes to the commentary sink.
pub fn finish_spin(
    game: &mut Game,
    wheel: &mut WheelEngine,
    cues: &impl CueSink,
    commentary: &impl CommentarySink,
) -> Result<Player, GameError> {
    let duration = wheel.spin_duration_ms().ok_or(GameError::NotSpinning)?;
    match wheel.advance(duration, cues) {
        SpinProgress::Finished { winner_index } => {
            let winner = game
                .round
                .pool
                .get(winner_index)
                .cloned()
                .ok_or(GameError::WinnerIndexOutOfRange {
                    index: winner_index,
                    pool: game.round.pool.len(),
                })?;
            game.round.pending_winner = Some(winner.clone());
            commentary.winner_announced(&winner.name);
            Ok(winner)
        }
        // Advancing by the full duration always finishes.
        SpinProgress::Idle | SpinProgress::Spinning { .. } => Err(GameError::NotSpinning),
    }
}

/// Confirm the pending winner: move them from the pool into team A.
///
/// The fourth confirmed pick completes the round: the remaining four pool
/// members become team B, the pool empties, and a history entry is recorded.
pub fn confirm_pick(game: &mut Game, cues: &impl CueSink) -> Result<(), GameError> {
    let winner = game
        .round
        .pending_winner
        .as_ref()
        .ok_or(GameError::NoPendingWinner)?;
    let idx = game
        .round
        .pool
        .iter()
        .position(|p| p.id == winner.id)
        .ok_or(GameError::WinnerNotInPool(winner.id))?;

    game.round.pending_winner = None;
    let picked = game.round.pool.remove(idx);
    game.round.team_a.push(picked);
    game.round.picks += 1;

    if game.round.team_a.len() == TEAM_SIZE {
        if game.round.pool.len() != TEAM_SIZE {
            return Err(GameError::UnevenSplit {
                remaining: game.round.pool.len(),
            });
        }
        game.round.team_b = std::mem::take(&mut game.round.pool);
        game.round.phase = RoundPhase::RoundComplete;
        game.history.push(TeamMatch {
            timestamp: Utc::now(),
            map: game.round.current_map.clone(),
            team_a: game.round.team_a.iter().map(|p| p.name.clone()).collect(),
            team_b: game.round.team_b.iter().map(|p| p.name.clone()).collect(),
        });
        cues.round_complete();
    }
    Ok(())
}

/// Draw one uniformly random captain per team. Valid exactly once per
/// completed round.
pub fn draw_captains(game: &mut Game, rng: &mut impl Rng) -> Result<(), GameError> {
    match game.round.phase {
        RoundPhase::RoundComplete => {}
        RoundPhase::CaptainsDrawn => return Err(GameError::CaptainsAlreadyDrawn),
        _ => return Err(GameError::RoundNotComplete),
    }
    let team_a = game
        .round
        .team_a
        .choose(rng)
        .cloned()
        .ok_or(GameError::RoundNotComplete)?;
    let team_b = game
        .round
        .team_b
        .choose(rng)
        .cloned()
        .ok_or(GameError::RoundNotComplete)?;
    game.round.captains = Some(Captains { team_a, team_b });
    game.round.phase = RoundPhase::CaptainsDrawn;
    Ok(())
}

/// Submit the post-round report: update every participant's ranking record,
/// persist rankings and history, then start the next round with the same
/// roster.
///
/// Kill counts are taken as supplied (missing players default to 0); this is
/// a scorekeeping aid, not an anti-cheat system.
pub fn finalize_report(
    game: &mut Game,
    winning_team: Option<Team>,
    kills: &HashMap<PlayerId, u32>,
    store: &impl KeyValueStore,
    rng: &mut impl Rng,
    commentary: &impl CommentarySink,
) -> Result<(), GameError> {
    if !game.round.is_complete() {
        return Err(GameError::RoundNotComplete);
    }
    let winning_team = winning_team.ok_or(GameError::WinningTeamUnset)?;

    apply_round_result(
        &mut game.ranking,
        &game.round.team_a,
        &game.round.team_b,
        winning_team,
        kills,
    );
    store.save_json(RANKING_KEY, &game.ranking);
    store.save_json(HISTORY_KEY, &game.history);

    start_round(game, rng, commentary)
}
