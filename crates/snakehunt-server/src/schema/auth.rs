//! Login and session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use snakehunt_core::model::User;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}
