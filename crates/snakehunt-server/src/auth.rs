//! Authentication: password hashing, JWT issuance, and the request extractor.
//!
//! Passwords are stored as `iterations$salt_hex$hash_hex`: PBKDF2-HMAC-SHA256
//! over a random 16-byte salt. Tokens are HS256 JWTs carrying the user's role
//! and bindings, so guards never touch the database.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use snakehunt_core::model::User;
use snakehunt_core::{Role, RoomId, TeamId, UserId};

use crate::error::ApiError;
use crate::state::AppState;

const PBKDF2_ROUNDS: u32 = 20_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password, &salt, PBKDF2_ROUNDS);
    format!("{}${}${}", PBKDF2_ROUNDS, hex::encode(salt), hex::encode(hash))
}

/// Checks a password against a stored hash. Malformed hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(rounds), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt), hex::decode(expected)) else {
        return false;
    };
    if rounds == 0 {
        return false;
    }
    let actual = derive(password, &salt, rounds);
    actual[..].ct_eq(&expected).into()
}

fn derive(password: &str, salt: &[u8], rounds: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut out);
    out
}

/// JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per RFC 7519.
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub team_id: Option<TeamId>,
    pub room_id: Option<RoomId>,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// A freshly signed token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signing and verification keys for session tokens.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5;
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user: &User) -> Result<IssuedToken, ApiError> {
        let now = Utc::now().timestamp();
        let exp = now + self.ttl.as_secs() as i64;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            team_id: user.team_id,
            room_id: user.room_id,
            iat: now,
            exp,
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = self.sign(&claims)?;
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| ApiError::InternalError(format!("token expiry {exp} out of range")))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn sign(&self, claims: &Claims) -> Result<String, ApiError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| ApiError::InternalError(format!("failed to sign token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::Unauthorized(format!("invalid token: {e}")))
    }
}

/// The caller of a request, taken from its bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub team_id: Option<TeamId>,
    pub room_id: Option<RoomId>,
}

impl AuthUser {
    /// An operator acting outside HTTP, e.g. from the CLI or at startup.
    /// Its id is never written to the database.
    pub fn system(name: &str) -> Self {
        AuthUser {
            id: UserId(0),
            username: name.to_string(),
            role: Role::SuperAdmin,
            team_id: None,
            room_id: None,
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("admin role required".to_string()))
        }
    }

    pub fn require_superadmin(&self) -> Result<(), ApiError> {
        if self.role == Role::SuperAdmin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("superadmin role required".to_string()))
        }
    }

    /// The team a participant plays for.
    pub fn team(&self) -> Result<TeamId, ApiError> {
        match (self.role, self.team_id) {
            (Role::Participant, Some(team)) => Ok(team),
            (Role::Participant, None) => {
                Err(ApiError::Forbidden("participant has no team".to_string()))
            }
            _ => Err(ApiError::Forbidden("participant role required".to_string())),
        }
    }

    /// The room an admin is limited to. Superadmins and unbound admins see
    /// every room.
    pub fn room_scope(&self) -> Option<RoomId> {
        match self.role {
            Role::Admin => self.room_id,
            _ => None,
        }
    }

    pub fn check_room(&self, room: RoomId) -> Result<(), ApiError> {
        match self.room_scope() {
            Some(own) if own != room => Err(ApiError::Forbidden(format!(
                "admin is bound to room {own}, not room {room}"
            ))),
            _ => Ok(()),
        }
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::Unauthorized("token subject is not a user id".to_string()))?;
        Ok(AuthUser {
            id: UserId(id),
            username: claims.username,
            role: claims.role,
            team_id: claims.team_id,
            room_id: claims.room_id,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".to_string()))?;
        state.jwt.verify(token)?.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: UserId(9),
            username: "river".into(),
            password_hash: String::new(),
            role,
            team_id: Some(TeamId(3)),
            room_id: None,
            created_at: Utc::now(),
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::new("unit-test-secret-value", Duration::from_secs(600))
    }

    #[test]
    fn password_round_trip() {
        let stored = hash_password("s3cret");
        assert_eq!(stored.split('$').count(), 3);
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("S3cret", &stored));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw"), hash_password("pw"));
    }

    #[test]
    fn hashes_are_standard_pbkdf2() {
        // PBKDF2-HMAC-SHA256("password", "salt", 1).
        let stored = "1$73616c74$120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b";
        assert!(verify_password("password", stored));
        assert!(!verify_password("passwore", stored));
        // A truncated hash must not match its prefix.
        assert!(!verify_password("password", "1$73616c74$120fb6cf"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        for stored in ["", "plain", "0$00$00", "10$zz$00", "10$00"] {
            assert!(!verify_password("pw", stored), "{stored}");
        }
    }

    #[test]
    fn token_round_trip() {
        let keys = keys();
        let issued = keys.issue(&user(Role::Participant)).unwrap();
        let auth: AuthUser = keys.verify(&issued.token).unwrap().try_into().unwrap();
        assert_eq!(auth.id, UserId(9));
        assert_eq!(auth.team().unwrap(), TeamId(3));
        assert!(issued.expires_at > Utc::now());
    }

    #[test]
    fn foreign_and_expired_tokens_are_rejected() {
        let issued = keys().issue(&user(Role::Admin)).unwrap();
        let other = JwtKeys::new("another-secret-value!", Duration::from_secs(600));
        assert!(matches!(other.verify(&issued.token), Err(ApiError::Unauthorized(_))));

        let keys = keys();
        let past = Utc::now().timestamp() - 3600;
        let stale = keys
            .sign(&Claims {
                sub: "9".into(),
                username: "river".into(),
                role: Role::Admin,
                team_id: None,
                room_id: None,
                iat: past - 60,
                exp: past,
                jti: "x".into(),
            })
            .unwrap();
        assert!(matches!(keys.verify(&stale), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn role_guards() {
        let to_auth = |role| AuthUser {
            id: UserId(1),
            username: "u".into(),
            role,
            team_id: None,
            room_id: Some(RoomId(2)),
        };
        let participant = to_auth(Role::Participant);
        let admin = to_auth(Role::Admin);
        let root = to_auth(Role::SuperAdmin);

        assert!(participant.require_admin().is_err());
        assert!(participant.team().is_err());
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_superadmin().is_err());
        assert!(root.require_admin().is_ok());
        assert!(root.require_superadmin().is_ok());

        assert!(admin.check_room(RoomId(2)).is_ok());
        assert!(matches!(admin.check_room(RoomId(5)), Err(ApiError::Forbidden(_))));
        assert_eq!(root.room_scope(), None);
        assert!(root.check_room(RoomId(5)).is_ok());
    }
}
