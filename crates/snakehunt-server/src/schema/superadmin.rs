//! Event setup types: rooms, maps, teams, users and questions.

use serde::{Deserialize, Serialize};

use snakehunt_core::model::{BoardMap, BoardRule};
use snakehunt_core::{QuestionId, Role, RoomId, TeamId};
use snakehunt_storage::NewQuestion;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMapRequest {
    pub name: String,
    pub max_teams: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    #[serde(flatten)]
    pub map: BoardMap,
    pub rules: Vec<BoardRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportQuestionsRequest {
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportQuestionsResponse {
    pub imported: usize,
    pub ids: Vec<QuestionId>,
}
