//! Leaderboard ranking: a sort and projection over team rows.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::BOARD_SIZE;
use crate::id::TeamId;
use crate::model::Team;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: u32,
    pub team_id: TeamId,
    pub team_name: String,
    pub position: u32,
    pub finished: bool,
    pub elapsed_seconds: i64,
    pub penalty_seconds: i64,
    pub total_seconds: i64,
    pub hints_used: u32,
    /// Share of the board covered, 0 to 100.
    pub progress_percent: u32,
}

fn compare(a: &Team, b: &Team, now: DateTime<Utc>) -> Ordering {
    match (a.is_finished(), b.is_finished()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a
            .total_seconds(now)
            .cmp(&b.total_seconds(now))
            .then(a.id.cmp(&b.id)),
        (false, false) => b
            .position
            .cmp(&a.position)
            .then(a.penalty_seconds.cmp(&b.penalty_seconds))
            // A team that has not moved yet sorts after any team that has.
            .then(match (a.last_moved_at, b.last_moved_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then(a.id.cmp(&b.id)),
    }
}

/// Ranks teams.
///
/// Finished teams come first, fastest total time (elapsed plus penalties)
/// first. Unfinished teams follow, furthest along first; ties go to fewer
/// penalty seconds, then to whoever got there earlier.
pub fn rank(teams: &[Team], now: DateTime<Utc>) -> Vec<LeaderboardEntry> {
    let mut sorted: Vec<&Team> = teams.iter().collect();
    sorted.sort_by(|a, b| compare(a, b, now));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, team)| LeaderboardEntry {
            rank: i as u32 + 1,
            team_id: team.id,
            team_name: team.name.clone(),
            position: team.position,
            finished: team.is_finished(),
            elapsed_seconds: team.elapsed_seconds(now),
            penalty_seconds: team.penalty_seconds,
            total_seconds: team.total_seconds(now),
            hints_used: team.hints_used,
            progress_percent: team.position * 100 / BOARD_SIZE,
        })
        .collect()
}
