//! Event setup handlers. Every route requires the superadmin role.

use axum::extract::State;
use axum::Json;

use snakehunt_core::model::{BoardRule, Question, Room, Team, User};
use snakehunt_core::{MapId, QuestionId, RoomId, RuleId, TeamId};
use snakehunt_storage::{NewQuestion, NewRule, QuestionUpdate, RoomUpdate};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::schema::common::ApiResponse;
use crate::schema::superadmin::{
    CreateMapRequest, CreateRoomRequest, CreateTeamRequest, CreateUserRequest,
    ImportQuestionsRequest, ImportQuestionsResponse, MapView,
};
use crate::state::AppState;

/// `GET /superadmin/rooms`
pub async fn list_rooms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Room>>>, ApiError> {
    auth.require_superadmin()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.list_rooms()?)))
}

/// `POST /superadmin/rooms`
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateRoomRequest>,
) -> Result<Json<ApiResponse<Room>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(
        service.create_room(&auth, &req.name, req.capacity)?,
    )))
}

/// `PATCH /superadmin/rooms/{id}`
pub async fn update_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<RoomUpdate>,
) -> Result<Json<ApiResponse<Room>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(
        service.update_room(&auth, RoomId(id), &update)?,
    )))
}

/// `GET /superadmin/maps`
pub async fn list_maps(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<MapView>>>, ApiError> {
    auth.require_superadmin()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.list_maps()?)))
}

/// `POST /superadmin/maps`
pub async fn create_map(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateMapRequest>,
) -> Result<Json<ApiResponse<MapView>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(
        service.create_map(&auth, &req.name, req.max_teams)?,
    )))
}

/// `POST /superadmin/maps/{id}/rules`
pub async fn add_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(rule): ApiJson<NewRule>,
) -> Result<Json<ApiResponse<BoardRule>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.add_rule(&auth, MapId(id), rule)?)))
}

/// `DELETE /superadmin/rules/{id}`
pub async fn delete_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<RuleId>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    service.delete_rule(&auth, RuleId(id))?;
    Ok(Json(ApiResponse::ok(RuleId(id))))
}

/// `POST /superadmin/teams`
pub async fn create_team(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateTeamRequest>,
) -> Result<Json<ApiResponse<Team>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.create_team(&auth, &req.name)?)))
}

/// `POST /superadmin/teams/{id}/reset`
pub async fn reset_team(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Team>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.reset_team(&auth, TeamId(id))?)))
}

/// `DELETE /superadmin/teams/{id}`
pub async fn delete_team(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<TeamId>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    service.delete_team(&auth, TeamId(id))?;
    Ok(Json(ApiResponse::ok(TeamId(id))))
}

/// `GET /superadmin/users`
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    auth.require_superadmin()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.list_users()?)))
}

/// `POST /superadmin/users`
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.create_user(&auth, &req)?)))
}

/// `GET /superadmin/questions`
pub async fn list_questions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Question>>>, ApiError> {
    auth.require_superadmin()?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.list_questions()?)))
}

/// `POST /superadmin/questions`
pub async fn create_question(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(question): ApiJson<NewQuestion>,
) -> Result<Json<ApiResponse<Question>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(
        service.create_question(&auth, &question)?,
    )))
}

/// `PATCH /superadmin/questions/{id}`
pub async fn update_question(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<QuestionUpdate>,
) -> Result<Json<ApiResponse<Question>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.update_question(
        &auth,
        QuestionId(id),
        &update,
    )?)))
}

/// `POST /superadmin/questions/import`
pub async fn import_questions(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<ImportQuestionsRequest>,
) -> Result<Json<ApiResponse<ImportQuestionsResponse>>, ApiError> {
    auth.require_superadmin()?;
    let mut service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(
        service.import_questions(&auth, &req.questions)?,
    )))
}
