//! Storage-layer input types.
//!
//! Entities themselves live in `snakehunt_core::model`; these are the shapes
//! accepted by insert and update calls.

use serde::{Deserialize, Serialize};

use snakehunt_core::{QuestionKind, Role, RoomId, RuleKind, TeamId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub kind: QuestionKind,
    pub prompt: String,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub is_snake: bool,
}

/// Partial update of a question. `None` leaves a column unchanged; a hint of
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionUpdate {
    pub prompt: Option<String>,
    pub answer: Option<String>,
    #[serde(default, with = "double_option")]
    pub hint: Option<Option<String>>,
    pub is_snake: Option<bool>,
    pub is_active: Option<bool>,
}

/// Partial update of a room. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomUpdate {
    pub name: Option<String>,
    pub capacity: Option<u32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub team_id: Option<TeamId>,
    pub room_id: Option<RoomId>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewRule {
    pub kind: RuleKind,
    pub start_tile: u32,
    pub end_tile: u32,
}

/// Distinguishes an absent field from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
