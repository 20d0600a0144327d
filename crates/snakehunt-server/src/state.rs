//! Application state shared by every handler.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers. Uses `tokio::sync::Mutex` (async-aware) instead of
//! `std::sync::Mutex` (blocking) so handlers await the lock without blocking
//! the tokio runtime. `GameService` owns a `rusqlite::Connection`, which is
//! `!Sync`, so an `RwLock` is not an option.

use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::cache::TtlCache;
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::{GameService, LeaderboardCache};

#[derive(Clone)]
pub struct AppState {
    /// The game service. One request at a time holds it.
    pub service: Arc<tokio::sync::Mutex<GameService>>,
    pub jwt: Arc<JwtKeys>,
    /// Shared with the service, which drops it on every change.
    pub leaderboard: Arc<LeaderboardCache>,
}

impl AppState {
    /// Opens the database named in `config` and creates the bootstrap
    /// superadmin if one is configured.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let leaderboard = Arc::new(TtlCache::new(config.leaderboard_ttl));
        let service = GameService::new(&config.db_path, config.game.clone(), leaderboard.clone())?;
        Self::assemble(service, leaderboard, config)
    }

    /// Same as [`AppState::new`] over an in-memory database (for testing).
    pub fn in_memory(config: &ServerConfig) -> Result<Self, ApiError> {
        let leaderboard = Arc::new(TtlCache::new(config.leaderboard_ttl));
        let service = GameService::in_memory(config.game.clone(), leaderboard.clone())?;
        Self::assemble(service, leaderboard, config)
    }

    fn assemble(
        mut service: GameService,
        leaderboard: Arc<LeaderboardCache>,
        config: &ServerConfig,
    ) -> Result<Self, ApiError> {
        if let Some((username, password)) = &config.bootstrap_admin {
            if let Some(user) = service.bootstrap_superadmin(username, password)? {
                tracing::info!(username = %user.username, "created bootstrap superadmin");
            }
        }
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            jwt: Arc::new(JwtKeys::new(&config.jwt_secret, config.token_ttl)),
            leaderboard,
        })
    }
}
