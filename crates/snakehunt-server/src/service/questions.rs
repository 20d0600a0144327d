//! Question assignment at checkpoint approval.

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::Connection;

use snakehunt_core::model::{Checkpoint, Question, QuestionAssignment};
use snakehunt_core::questions::select_question;
use snakehunt_core::KindWeights;
use snakehunt_storage::tables::{assignments, questions};

use crate::error::ApiError;

/// A question handed to a team.
#[derive(Debug, Clone)]
pub struct Assigned {
    pub assignment: QuestionAssignment,
    pub question: Question,
    pub fell_back: bool,
}

/// Draws an unseen question for `checkpoint` and records the assignment.
///
/// Fails with `Conflict` when the team has seen every active question.
pub(crate) fn assign_question<R: Rng + ?Sized>(
    conn: &Connection,
    checkpoint: &Checkpoint,
    weights: &KindWeights,
    rng: &mut R,
    at: DateTime<Utc>,
) -> Result<Assigned, ApiError> {
    let candidates = questions::unseen_active(conn, checkpoint.team_id)?;
    let pick = select_question(&candidates, checkpoint.is_snake, weights, rng).ok_or_else(|| {
        ApiError::Conflict(format!(
            "no unseen question left for team {}",
            checkpoint.team_id
        ))
    })?;
    if pick.fell_back {
        tracing::warn!(
            checkpoint_id = %checkpoint.id,
            "snake question pool exhausted, assigning a regular question"
        );
    }
    let id = assignments::insert(conn, checkpoint.id, checkpoint.team_id, pick.question.id, at)?;
    Ok(Assigned {
        assignment: assignments::get(conn, id)?,
        question: pick.question.clone(),
        fell_back: pick.fell_back,
    })
}
