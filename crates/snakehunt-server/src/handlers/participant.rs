//! Participant handlers. The team always comes from the caller's token.

use axum::extract::State;
use axum::Json;

use snakehunt_core::model::DiceRoll;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::schema::common::ApiResponse;
use crate::schema::participant::{
    HintResponse, RollResponse, SubmitAnswerRequest, SubmitAnswerResponse, TeamStateView,
};
use crate::state::AppState;

/// `GET /team`
pub async fn team_state(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<TeamStateView>>, ApiError> {
    let team = auth.team()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.team_state(team)?)))
}

/// `POST /team/roll`
pub async fn roll(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<RollResponse>>, ApiError> {
    let team = auth.team()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.roll_dice(&auth, team)?)))
}

/// `GET /team/rolls`
pub async fn rolls(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<DiceRoll>>>, ApiError> {
    let team = auth.team()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.list_rolls(team)?)))
}

/// `POST /team/answer`
pub async fn submit_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<SubmitAnswerRequest>,
) -> Result<Json<ApiResponse<SubmitAnswerResponse>>, ApiError> {
    let team = auth.team()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(
        service.submit_answer(&auth, team, &req.answer)?,
    )))
}

/// `POST /team/hint`
pub async fn use_hint(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<HintResponse>>, ApiError> {
    let team = auth.team()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.use_hint(&auth, team)?)))
}
