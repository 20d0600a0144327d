//! Room admin dashboard types.

use serde::{Deserialize, Serialize};

use snakehunt_core::model::{
    Checkpoint, DiceRoll, Question, QuestionAssignment, Team, TimeLog, User,
};
use snakehunt_core::{AssignmentStatus, CheckpointStatus, QuestionKind};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckpointFilter {
    pub status: Option<CheckpointStatus>,
}

/// `status` absent means every unmarked assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentFilter {
    pub status: Option<AssignmentStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckpointView {
    #[serde(flatten)]
    pub checkpoint: Checkpoint,
    pub team_name: String,
    pub room_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveResponse {
    pub checkpoint: Checkpoint,
    pub assignment: QuestionAssignment,
    pub question: Question,
    /// A snake checkpoint got a regular question because the snake pool
    /// was exhausted.
    pub fell_back: bool,
}

/// An assignment alongside what the marker needs to judge it.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReview {
    #[serde(flatten)]
    pub assignment: QuestionAssignment,
    pub team_name: String,
    pub kind: QuestionKind,
    pub prompt: String,
    pub expected_answer: String,
    /// Submitted answer equals the expected one, ignoring case and spacing.
    pub auto_match: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkRequest {
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkResponse {
    pub assignment: QuestionAssignment,
    pub checkpoint: Checkpoint,
    pub team: Team,
    /// Penalty added by this marking; zero when correct.
    pub penalty_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeAdjustRequest {
    /// Positive adds time, negative removes it.
    pub seconds: i64,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDetail {
    pub team: Team,
    pub members: Vec<User>,
    pub rolls: Vec<DiceRoll>,
    pub checkpoints: Vec<Checkpoint>,
    pub time_logs: Vec<TimeLog>,
}
