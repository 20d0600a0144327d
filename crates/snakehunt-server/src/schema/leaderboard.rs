//! Leaderboard view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use snakehunt_core::LeaderboardEntry;

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<LeaderboardEntry>,
}
