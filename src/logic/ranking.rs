//! Ranking accumulator: pure reducer over completed rounds plus standings view.

use crate::models::{Game, Player, PlayerId, RankingRecord, Team};
use serde::Serialize;
use std::collections::HashMap;

/// Fold one finalized round into the ranking records.
///
/// Every participant gets `matches += 1` and their supplied kill count
/// (0 when absent); members of the winning team also get `wins += 1`.
/// Records are created lazily on first participation.
///
/// Not idempotent: applying the same round twice double-counts. The round
/// coordinator calls this exactly once per completed round.
pub fn apply_round_result(
    records: &mut HashMap<PlayerId, RankingRecord>,
    team_a: &[Player],
    team_b: &[Player],
    winning_team: Team,
    kills: &HashMap<PlayerId, u32>,
) {
    for (team, members) in [(Team::A, team_a), (Team::B, team_b)] {
        for player in members {
            let record = records.entry(player.id).or_default();
            record.record_match(
                kills.get(&player.id).copied().unwrap_or(0),
                team == winning_team,
            );
        }
    }
}

/// One row of the ranking table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StandingEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub kills: u32,
    pub wins: u32,
    pub matches: u32,
    /// Derived `wins / matches`, rounded to whole percent.
    pub win_rate_percent: u32,
}

/// Ranking rows sorted by wins, then kills, both descending.
pub fn standings(game: &Game) -> Vec<StandingEntry> {
    let mut rows: Vec<StandingEntry> = game
        .ranking
        .iter()
        .map(|(id, record)| {
            let name = game
                .players
                .iter()
                .find(|p| p.id == *id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            StandingEntry {
                player_id: *id,
                name,
                kills: record.kills,
                wins: record.wins,
                matches: record.matches,
                win_rate_percent: (record.win_rate() * 100.0).round() as u32,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.wins.cmp(&a.wins).then(b.kills.cmp(&a.kills)));
    rows
}
