//! GameService: the single coordinator between HTTP handlers and storage.
//!
//! All business logic flows through [`GameService`]. Handlers are thin
//! wrappers that check roles and delegate to these methods. Every operation
//! that changes state runs inside one SQLite transaction, then drops the
//! cached leaderboard and writes an audit record.
//!
//! The methods are split by dashboard:
//!
//! - [`dice`]: the roll state machine
//! - [`questions`]: question assignment at approval time
//! - [`admin`]: checkpoint approval, marking, time adjustments
//! - [`superadmin`]: event setup
//! - [`participant`]: team view, answers, hints
//! - [`leaderboard`]: ranking
//! - [`auth`]: credentials and accounts

pub mod admin;
pub mod auth;
pub mod dice;
pub mod leaderboard;
pub mod participant;
pub mod questions;
pub mod superadmin;

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rusqlite::Connection;

use snakehunt_core::{Board, MapId};
use snakehunt_storage::tables::maps;
use snakehunt_storage::SqliteStore;

use crate::cache::TtlCache;
use crate::config::GameConfig;
use crate::error::ApiError;
use crate::schema::leaderboard::LeaderboardResponse;

/// Cache of the rendered leaderboard. There is only one board, keyed by `()`.
pub type LeaderboardCache = TtlCache<(), LeaderboardResponse>;

pub struct GameService {
    store: SqliteStore,
    /// Dice and selection randomness. Seeded from config for reproducible
    /// events and tests.
    rng: ChaCha8Rng,
    config: GameConfig,
    leaderboard: Arc<LeaderboardCache>,
}

impl GameService {
    /// Opens (or creates) the database at `db_path`.
    pub fn new(
        db_path: &str,
        config: GameConfig,
        leaderboard: Arc<LeaderboardCache>,
    ) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)?;
        Ok(Self::with_store(store, config, leaderboard))
    }

    /// Runs against an in-memory database (for testing).
    pub fn in_memory(
        config: GameConfig,
        leaderboard: Arc<LeaderboardCache>,
    ) -> Result<Self, ApiError> {
        let store = SqliteStore::in_memory()?;
        Ok(Self::with_store(store, config, leaderboard))
    }

    fn with_store(store: SqliteStore, config: GameConfig, leaderboard: Arc<LeaderboardCache>) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        GameService {
            store,
            rng,
            config,
            leaderboard,
        }
    }

    /// Drops the cached leaderboard after a committed change.
    fn changed(&self) {
        self.leaderboard.invalidate(&());
    }
}

/// Builds the board for a map. Teams without a map play on a board with no
/// snakes or ladders.
pub(crate) fn load_board(conn: &Connection, map_id: Option<MapId>) -> Result<Board, ApiError> {
    match map_id {
        Some(id) => {
            let rules = maps::rules(conn, id)?;
            Ok(Board::new(&rules)?)
        }
        None => Ok(Board::default()),
    }
}

/// Test fixtures shared by the service modules.
#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use snakehunt_core::model::{Question, Team};
    use snakehunt_core::{QuestionKind, Role, RoomId, RuleKind, TeamId, UserId};
    use snakehunt_storage::tables::{questions, rooms, teams, time_logs, users};
    use snakehunt_storage::{NewQuestion, NewRule, NewUser};

    use super::*;
    use crate::auth::AuthUser;

    pub fn service() -> GameService {
        let config = GameConfig {
            rng_seed: Some(11),
            ..GameConfig::default()
        };
        GameService::in_memory(config, Arc::new(TtlCache::new(Duration::from_secs(60)))).unwrap()
    }

    pub fn conn(service: &GameService) -> &Connection {
        service.store.conn()
    }

    pub fn room(service: &GameService, name: &str, capacity: u32) -> RoomId {
        rooms::insert(conn(service), name, capacity).unwrap()
    }

    pub fn team(service: &GameService, name: &str) -> TeamId {
        teams::insert(conn(service), name, None).unwrap()
    }

    pub fn reload(service: &GameService, id: TeamId) -> Team {
        teams::get(conn(service), id).unwrap()
    }

    /// A team on tile 20 of a map where every tile one roll away is a snake
    /// head leading down to tile 10.
    pub fn snake_pit(service: &GameService) -> TeamId {
        let map = maps::insert(conn(service), "pit", 4).unwrap();
        for start in 21..=26 {
            maps::insert_rule(
                conn(service),
                map,
                &NewRule {
                    kind: RuleKind::Snake,
                    start_tile: start,
                    end_tile: 10,
                },
            )
            .unwrap();
        }
        let team = teams::insert(conn(service), "alpha", Some(map)).unwrap();
        conn(service)
            .execute("UPDATE teams SET position = 20 WHERE id = ?1", [team.0])
            .unwrap();
        team
    }

    /// Asserts the team's running penalty equals the sum of its time logs.
    pub fn assert_penalty_ledger(service: &GameService, team: TeamId) {
        let logged = time_logs::total_for_team(conn(service), team).unwrap();
        assert_eq!(reload(service, team).penalty_seconds, logged);
    }

    pub fn question(service: &GameService, prompt: &str, is_snake: bool) -> Question {
        let id = questions::insert(
            conn(service),
            &NewQuestion {
                kind: QuestionKind::Trivia,
                prompt: prompt.to_string(),
                answer: format!("{prompt} answer"),
                hint: Some(format!("{prompt} hint")),
                is_snake,
            },
        )
        .unwrap();
        questions::get(conn(service), id).unwrap()
    }

    pub fn admin(service: &GameService, room: Option<RoomId>) -> AuthUser {
        let name = format!("admin-{}", room.map_or(0, |r| r.0));
        let id = users::insert(
            conn(service),
            &NewUser {
                username: name.clone(),
                password_hash: "x".into(),
                role: Role::Admin,
                team_id: None,
                room_id: room,
            },
        )
        .unwrap();
        AuthUser {
            id,
            username: name,
            role: Role::Admin,
            team_id: None,
            room_id: room,
        }
    }

    pub fn player(team: TeamId) -> AuthUser {
        AuthUser {
            id: UserId(0),
            username: format!("player-{team}"),
            role: Role::Participant,
            team_id: Some(team),
            room_id: None,
        }
    }
}
