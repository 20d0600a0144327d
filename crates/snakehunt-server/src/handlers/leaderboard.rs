//! Public leaderboard.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::leaderboard::LeaderboardResponse;
use crate::state::AppState;

/// Current ranking. Served from cache without taking the service lock when
/// possible.
///
/// `GET /leaderboard`
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LeaderboardResponse>>, ApiError> {
    if let Some(cached) = state.leaderboard.get(&()) {
        return Ok(Json(ApiResponse::ok(cached)));
    }
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.leaderboard()?)))
}
