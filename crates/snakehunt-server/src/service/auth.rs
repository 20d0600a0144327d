//! Credential checks and account bootstrap.

use serde_json::json;

use snakehunt_core::model::User;
use snakehunt_core::{Role, UserId};
use snakehunt_storage::tables::users;
use snakehunt_storage::NewUser;

use super::GameService;
use crate::audit;
use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;

impl GameService {
    /// Checks a username and password. Both failure modes give the same
    /// error so usernames cannot be probed.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let rejected = || ApiError::Unauthorized("invalid username or password".to_string());
        let user = users::find_by_username(self.store.conn(), username.trim())?.ok_or_else(rejected)?;
        if !verify_password(password, &user.password_hash) {
            tracing::warn!(username = %user.username, "failed login");
            return Err(rejected());
        }
        audit::record(&user.username, "login", json!({ "user_id": user.id }));
        Ok(user)
    }

    pub fn user(&self, id: UserId) -> Result<User, ApiError> {
        Ok(users::get(self.store.conn(), id)?)
    }

    /// Creates the first superadmin on an empty database. Returns `None` when
    /// accounts already exist.
    pub fn bootstrap_superadmin(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, ApiError> {
        let conn = self.store.conn();
        if users::count(conn)? > 0 {
            return Ok(None);
        }
        let id = users::insert(
            conn,
            &NewUser {
                username: username.to_string(),
                password_hash: hash_password(password),
                role: Role::SuperAdmin,
                team_id: None,
                room_id: None,
            },
        )?;
        let user = users::get(conn, id)?;
        audit::record("bootstrap", "create_user", json!({ "user_id": id, "role": user.role }));
        Ok(Some(user))
    }
}
