//! Runtime configuration read from `SNAKEHUNT_*` environment variables.
//!
//! Everything is read once at startup. A malformed value is a hard error
//! rather than a silent fallback to the default.

use std::str::FromStr;
use std::time::Duration;

use rand::RngCore;

use snakehunt_core::KindWeights;

/// A configuration variable that could not be used.
#[derive(Debug, thiserror::Error)]
#[error("{var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub reason: String,
}

/// Rules of play that an operator may tune per event.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Seconds added when a team reveals a hint.
    pub hint_penalty_secs: i64,
    /// Seconds added when an answer is marked incorrect.
    pub wrong_answer_penalty_secs: i64,
    pub question_weights: KindWeights,
    /// Fixed seed for dice and selection. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            hint_penalty_secs: 120,
            wrong_answer_penalty_secs: 300,
            question_weights: KindWeights::default(),
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: u16,
    pub jwt_secret: String,
    /// True when no secret was configured and a random one was generated.
    /// Tokens then stop working across restarts.
    pub jwt_secret_generated: bool,
    pub token_ttl: Duration,
    pub leaderboard_ttl: Duration,
    /// `(username, password)` of a superadmin created on an empty database.
    pub bootstrap_admin: Option<(String, String)>,
    pub game: GameConfig,
}

impl ServerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (jwt_secret, jwt_secret_generated) = match lookup("SNAKEHUNT_JWT_SECRET") {
            Some(secret) if secret.len() < 16 => {
                return Err(ConfigError {
                    var: "SNAKEHUNT_JWT_SECRET",
                    reason: "must be at least 16 characters".to_string(),
                })
            }
            Some(secret) => (secret, false),
            None => (random_secret(), true),
        };

        let bootstrap_admin = match lookup("SNAKEHUNT_BOOTSTRAP_ADMIN") {
            Some(raw) => Some(parse_credentials(&raw).ok_or_else(|| ConfigError {
                var: "SNAKEHUNT_BOOTSTRAP_ADMIN",
                reason: "expected username:password".to_string(),
            })?),
            None => None,
        };

        let game = GameConfig {
            hint_penalty_secs: parsed(&lookup, "SNAKEHUNT_HINT_PENALTY_SECS", 120)?,
            wrong_answer_penalty_secs: parsed(&lookup, "SNAKEHUNT_WRONG_ANSWER_PENALTY_SECS", 300)?,
            question_weights: parsed(&lookup, "SNAKEHUNT_QUESTION_WEIGHTS", KindWeights::default())?,
            rng_seed: match lookup("SNAKEHUNT_RNG_SEED") {
                Some(_) => Some(parsed(&lookup, "SNAKEHUNT_RNG_SEED", 0u64)?),
                None => None,
            },
        };

        Ok(ServerConfig {
            db_path: lookup("SNAKEHUNT_DB_PATH").unwrap_or_else(|| "snakehunt.db".to_string()),
            port: parsed(&lookup, "SNAKEHUNT_PORT", 3000)?,
            jwt_secret,
            jwt_secret_generated,
            token_ttl: Duration::from_secs(parsed(&lookup, "SNAKEHUNT_TOKEN_TTL_SECS", 43_200)?),
            leaderboard_ttl: Duration::from_secs(parsed(
                &lookup,
                "SNAKEHUNT_LEADERBOARD_TTL_SECS",
                5,
            )?),
            bootstrap_admin,
            game,
        })
    }

    /// An in-memory configuration with a fixed secret and seed.
    pub fn for_tests() -> Self {
        ServerConfig {
            db_path: ":memory:".to_string(),
            port: 0,
            jwt_secret: "snakehunt-test-secret-0123456789".to_string(),
            jwt_secret_generated: false,
            token_ttl: Duration::from_secs(3600),
            leaderboard_ttl: Duration::from_secs(5),
            bootstrap_admin: None,
            game: GameConfig {
                rng_seed: Some(7),
                ..GameConfig::default()
            },
        }
    }
}

fn parsed<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            var,
            reason: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}

fn parse_credentials(raw: &str) -> Option<(String, String)> {
    let (user, pass) = raw.split_once(':')?;
    let user = user.trim();
    if user.is_empty() || pass.is_empty() {
        return None;
    }
    Some((user.to_string(), pass.to_string()))
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use snakehunt_core::QuestionKind;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.db_path, "snakehunt.db");
        assert_eq!(cfg.port, 3000);
        assert!(cfg.jwt_secret_generated);
        assert_eq!(cfg.jwt_secret.len(), 64);
        assert_eq!(cfg.token_ttl, Duration::from_secs(43_200));
        assert_eq!(cfg.game.hint_penalty_secs, 120);
        assert_eq!(cfg.game.wrong_answer_penalty_secs, 300);
        assert!(cfg.game.rng_seed.is_none());
        assert!(cfg.bootstrap_admin.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("SNAKEHUNT_PORT", "8080"),
            ("SNAKEHUNT_JWT_SECRET", "a-very-long-secret-value"),
            ("SNAKEHUNT_QUESTION_WEIGHTS", "riddle=1"),
            ("SNAKEHUNT_RNG_SEED", "42"),
            ("SNAKEHUNT_BOOTSTRAP_ADMIN", "root:hunter2:x"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert!(!cfg.jwt_secret_generated);
        assert_eq!(cfg.game.question_weights.weight(QuestionKind::Riddle), 1);
        assert_eq!(cfg.game.question_weights.weight(QuestionKind::Trivia), 0);
        assert_eq!(cfg.game.rng_seed, Some(42));
        assert_eq!(
            cfg.bootstrap_admin,
            Some(("root".to_string(), "hunter2:x".to_string()))
        );
    }

    #[test]
    fn malformed_values_fail() {
        assert_eq!(config(&[("SNAKEHUNT_PORT", "http")]).unwrap_err().var, "SNAKEHUNT_PORT");
        assert!(config(&[("SNAKEHUNT_JWT_SECRET", "short")]).is_err());
        assert!(config(&[("SNAKEHUNT_BOOTSTRAP_ADMIN", "nopassword")]).is_err());
        assert!(config(&[("SNAKEHUNT_QUESTION_WEIGHTS", "poetry=2")]).is_err());
        assert!(config(&[("SNAKEHUNT_HINT_PENALTY_SECS", "two")]).is_err());
    }
}
