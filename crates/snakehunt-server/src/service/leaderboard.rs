//! Leaderboard projection.

use chrono::Utc;

use snakehunt_core::leaderboard::rank;
use snakehunt_storage::tables::teams;

use super::GameService;
use crate::error::ApiError;
use crate::schema::leaderboard::LeaderboardResponse;

impl GameService {
    /// Ranks every team as of now. Reads through the shared cache.
    pub fn leaderboard(&self) -> Result<LeaderboardResponse, ApiError> {
        if let Some(cached) = self.leaderboard.get(&()) {
            return Ok(cached);
        }
        let now = Utc::now();
        let board = LeaderboardResponse {
            generated_at: now,
            entries: rank(&teams::list(self.store.conn())?, now),
        };
        self.leaderboard.insert((), board.clone());
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{self, player};

    #[test]
    fn cache_is_dropped_by_a_roll() {
        let mut service = testing::service();
        testing::room(&service, "lab", 3);
        let slow = testing::team(&service, "slow");
        let fast = testing::team(&service, "fast");

        let before = service.leaderboard().unwrap();
        assert_eq!(before.entries.len(), 2);
        assert!(before.entries.iter().all(|e| e.position == 1));
        // Cached: the same snapshot comes back.
        assert_eq!(service.leaderboard().unwrap().generated_at, before.generated_at);

        service.roll_dice(&player(fast), fast).unwrap();
        let after = service.leaderboard().unwrap();
        assert_eq!(after.entries[0].team_id, fast);
        assert_eq!(after.entries[1].team_id, slow);
        assert!(after.entries[0].position > 1);
    }
}
