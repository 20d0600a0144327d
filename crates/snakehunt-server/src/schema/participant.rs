//! Participant dashboard types.

use serde::{Deserialize, Serialize};

use snakehunt_core::model::{BoardRule, Checkpoint, DiceRoll, QuestionAssignment, Room, Team};
use snakehunt_core::{AssignmentId, AssignmentStatus, CheckpointId, MoveOutcome, QuestionKind};

/// Everything the participant dashboard polls for.
#[derive(Debug, Clone, Serialize)]
pub struct TeamStateView {
    pub team: Team,
    pub room: Option<Room>,
    pub checkpoint: Option<Checkpoint>,
    pub assignment: Option<AssignmentView>,
    /// Snakes and ladders of the team's map.
    pub rules: Vec<BoardRule>,
    pub elapsed_seconds: i64,
    pub penalty_seconds: i64,
    pub total_seconds: i64,
}

/// A question as the team sees it: never the expected answer, and the hint
/// only once it has been paid for.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    pub id: AssignmentId,
    pub checkpoint_id: CheckpointId,
    pub kind: QuestionKind,
    pub prompt: String,
    pub status: AssignmentStatus,
    pub answer_text: Option<String>,
    pub has_hint: bool,
    pub hint_used: bool,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollResponse {
    pub roll: DiceRoll,
    pub outcome: MoveOutcome,
    pub team: Team,
    /// Where to go next. `None` once the team has finished.
    pub room: Option<Room>,
    pub checkpoint: Option<Checkpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResponse {
    pub assignment: QuestionAssignment,
}

#[derive(Debug, Clone, Serialize)]
pub struct HintResponse {
    pub hint: String,
    pub penalty_seconds: i64,
    pub hints_used: u32,
}
