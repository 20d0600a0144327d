//! What a team sees and does between rolls.

use chrono::Utc;
use rusqlite::Connection;
use serde_json::json;

use snakehunt_core::model::{Checkpoint, DiceRoll, QuestionAssignment};
use snakehunt_core::{AssignmentId, TeamId, TimeLogReason};
use snakehunt_storage::tables::time_logs::{self, NewTimeLog};
use snakehunt_storage::tables::{assignments, checkpoints, maps, questions, rolls, rooms, teams};

use super::GameService;
use crate::audit;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schema::participant::{
    AssignmentView, HintResponse, SubmitAnswerResponse, TeamStateView,
};

/// The team's open checkpoint and the question assigned at it, if any.
fn current_assignment(
    conn: &Connection,
    team_id: TeamId,
) -> Result<Option<(Checkpoint, Option<QuestionAssignment>)>, ApiError> {
    match checkpoints::open_for_team(conn, team_id)? {
        Some(checkpoint) => {
            let assignment = assignments::for_checkpoint(conn, checkpoint.id)?;
            Ok(Some((checkpoint, assignment)))
        }
        None => Ok(None),
    }
}

/// The unmarked assignment a participant may act on.
fn actionable_assignment(conn: &Connection, team_id: TeamId) -> Result<QuestionAssignment, ApiError> {
    match current_assignment(conn, team_id)? {
        Some((_, Some(assignment))) if assignment.status.is_unmarked() => Ok(assignment),
        Some((checkpoint, _)) => Err(ApiError::Conflict(format!(
            "checkpoint {} has no question awaiting an answer",
            checkpoint.id
        ))),
        None => Err(ApiError::Conflict("team has no open checkpoint".to_string())),
    }
}

impl GameService {
    pub fn team_state(&self, team_id: TeamId) -> Result<TeamStateView, ApiError> {
        let conn = self.store.conn();
        let now = Utc::now();
        let team = teams::get(conn, team_id)?;
        let room = team
            .current_room_id
            .map(|id| rooms::get(conn, id))
            .transpose()?;
        let rules = match team.map_id {
            Some(map) => maps::rules(conn, map)?,
            None => Vec::new(),
        };

        let (checkpoint, assignment) = match current_assignment(conn, team_id)? {
            Some((checkpoint, assignment)) => (Some(checkpoint), assignment),
            None => (None, None),
        };
        let assignment = match assignment {
            Some(a) => {
                let question = questions::get(conn, a.question_id)?;
                Some(AssignmentView {
                    id: a.id,
                    checkpoint_id: a.checkpoint_id,
                    kind: question.kind,
                    prompt: question.prompt,
                    status: a.status,
                    answer_text: a.answer_text,
                    has_hint: question.hint.is_some(),
                    hint_used: a.hint_used,
                    hint: if a.hint_used { question.hint } else { None },
                })
            }
            None => None,
        };

        Ok(TeamStateView {
            elapsed_seconds: team.elapsed_seconds(now),
            penalty_seconds: team.penalty_seconds,
            total_seconds: team.total_seconds(now),
            team,
            room,
            checkpoint,
            assignment,
            rules,
        })
    }

    pub fn list_rolls(&self, team_id: TeamId) -> Result<Vec<DiceRoll>, ApiError> {
        let conn = self.store.conn();
        teams::get(conn, team_id)?;
        Ok(rolls::list_for_team(conn, team_id)?)
    }

    /// Stores the team's answer. It can be resubmitted until an admin marks it.
    pub fn submit_answer(
        &mut self,
        actor: &AuthUser,
        team_id: TeamId,
        answer: &str,
    ) -> Result<SubmitAnswerResponse, ApiError> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ApiError::BadRequest("answer must not be empty".to_string()));
        }
        let now = Utc::now();
        let assignment = self
            .store
            .transaction(|tx| -> Result<QuestionAssignment, ApiError> {
                let assignment = actionable_assignment(tx, team_id)?;
                assignments::submit(tx, assignment.id, answer, now)?;
                Ok(assignments::get(tx, assignment.id)?)
            })?;

        audit::record(
            &actor.username,
            "submit_answer",
            json!({ "team_id": team_id, "assignment_id": assignment.id }),
        );
        Ok(SubmitAnswerResponse { assignment })
    }

    /// Reveals the hint for the current question at a time cost.
    pub fn use_hint(&mut self, actor: &AuthUser, team_id: TeamId) -> Result<HintResponse, ApiError> {
        let now = Utc::now();
        let penalty = self.config.hint_penalty_secs;
        let (hint, hints_used, assignment_id) =
            self.store.transaction(|tx| -> Result<(String, u32, AssignmentId), ApiError> {
                let assignment = actionable_assignment(tx, team_id)?;
                if assignment.hint_used {
                    return Err(ApiError::Conflict("hint already used".to_string()));
                }
                let hint = questions::get(tx, assignment.question_id)?
                    .hint
                    .ok_or_else(|| ApiError::Conflict("this question has no hint".to_string()))?;

                assignments::use_hint(tx, assignment.id)?;
                teams::increment_hints(tx, team_id)?;
                time_logs::record(
                    tx,
                    &NewTimeLog {
                        team_id,
                        seconds: penalty,
                        reason: TimeLogReason::HintPenalty,
                        note: Some(format!("assignment {}", assignment.id)),
                        created_by: None,
                    },
                    now,
                )?;
                let team = teams::get(tx, team_id)?;
                Ok((hint, team.hints_used, assignment.id))
            })?;

        self.changed();
        audit::record(
            &actor.username,
            "use_hint",
            json!({
                "team_id": team_id,
                "assignment_id": assignment_id,
                "penalty_seconds": penalty,
            }),
        );
        Ok(HintResponse {
            hint,
            penalty_seconds: penalty,
            hints_used,
        })
    }
}
