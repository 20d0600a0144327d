//! Login and session handlers.

use axum::extract::State;
use axum::Json;

use snakehunt_core::model::User;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::schema::auth::{LoginRequest, LoginResponse};
use crate::schema::common::ApiResponse;
use crate::state::AppState;

/// Exchanges credentials for a bearer token.
///
/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let user = {
        let service = state.service.lock().await;
        service.authenticate(&req.username, &req.password)?
    };
    let issued = state.jwt.issue(&user)?;
    Ok(Json(ApiResponse::ok(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user,
    })))
}

/// Returns the account behind the token.
///
/// `GET /auth/me`
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let service = state.service.lock().await;
    let user = service.user(auth.id).map_err(|e| match e {
        // The account was deleted after the token was issued.
        ApiError::NotFound(_) => ApiError::Unauthorized("account no longer exists".to_string()),
        other => other,
    })?;
    Ok(Json(ApiResponse::ok(user)))
}
