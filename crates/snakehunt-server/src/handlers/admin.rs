//! Room admin handlers. Superadmins pass every admin guard.

use axum::extract::State;
use axum::Json;

use snakehunt_core::model::Team;
use snakehunt_core::{AssignmentId, CheckpointId, TeamId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::schema::admin::{
    ApproveResponse, AssignmentFilter, AssignmentReview, CheckpointFilter, CheckpointView,
    MarkRequest, MarkResponse, TeamDetail, TimeAdjustRequest,
};
use crate::schema::common::ApiResponse;
use crate::state::AppState;

/// `GET /admin/checkpoints?status=`
pub async fn list_checkpoints(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(filter): ApiQuery<CheckpointFilter>,
) -> Result<Json<ApiResponse<Vec<CheckpointView>>>, ApiError> {
    auth.require_admin()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(
        service.list_checkpoints(&auth, filter.status)?,
    )))
}

/// `POST /admin/checkpoints/{id}/approve`
pub async fn approve_checkpoint(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<ApproveResponse>>, ApiError> {
    auth.require_admin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(
        service.approve_checkpoint(&auth, CheckpointId(id))?,
    )))
}

/// `GET /admin/assignments?status=`
pub async fn list_assignments(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(filter): ApiQuery<AssignmentFilter>,
) -> Result<Json<ApiResponse<Vec<AssignmentReview>>>, ApiError> {
    auth.require_admin()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(
        service.list_assignments(&auth, filter.status)?,
    )))
}

/// `POST /admin/assignments/{id}/mark`
pub async fn mark_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<MarkRequest>,
) -> Result<Json<ApiResponse<MarkResponse>>, ApiError> {
    auth.require_admin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.mark_answer(
        &auth,
        AssignmentId(id),
        req.correct,
    )?)))
}

/// `GET /admin/teams`
pub async fn list_teams(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Team>>>, ApiError> {
    auth.require_admin()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.list_teams()?)))
}

/// `GET /admin/teams/{id}`
pub async fn team_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<TeamDetail>>, ApiError> {
    auth.require_admin()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.team_detail(TeamId(id))?)))
}

/// `POST /admin/teams/{id}/time`
pub async fn adjust_time(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<TimeAdjustRequest>,
) -> Result<Json<ApiResponse<Team>>, ApiError> {
    auth.require_admin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.adjust_time(
        &auth,
        TeamId(id),
        req.seconds,
        req.note,
    )?)))
}
