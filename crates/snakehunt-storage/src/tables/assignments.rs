//! `question_assignments` table: the question a team answers at a checkpoint.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use snakehunt_core::model::QuestionAssignment;
use snakehunt_core::{
    AssignmentId, AssignmentStatus, CheckpointId, QuestionId, RoomId, TeamId, UserId,
};

use super::expect_one;
use crate::convert::{assignment_from_row, ASSIGNMENT_COLUMNS};
use crate::error::StorageError;

/// Assigns a question. Fails with `Duplicate` if the checkpoint already has
/// one or the team has seen the question.
pub fn insert(
    conn: &Connection,
    checkpoint_id: CheckpointId,
    team_id: TeamId,
    question_id: QuestionId,
    at: DateTime<Utc>,
) -> Result<AssignmentId, StorageError> {
    conn.execute(
        "INSERT INTO question_assignments (checkpoint_id, team_id, question_id, status, assigned_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            checkpoint_id.0,
            team_id.0,
            question_id.0,
            AssignmentStatus::Assigned.as_str(),
            at,
        ],
    )
    .map_err(|e| StorageError::on_unique(e, "assignment"))?;
    Ok(AssignmentId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: AssignmentId) -> Result<QuestionAssignment, StorageError> {
    conn.query_row(
        &format!("SELECT {ASSIGNMENT_COLUMNS} FROM question_assignments WHERE id = ?1"),
        params![id.0],
        assignment_from_row,
    )
    .optional()?
    .ok_or(StorageError::NotFound {
        entity: "assignment",
        id: id.0,
    })
}

pub fn for_checkpoint(
    conn: &Connection,
    checkpoint_id: CheckpointId,
) -> Result<Option<QuestionAssignment>, StorageError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {ASSIGNMENT_COLUMNS} FROM question_assignments WHERE checkpoint_id = ?1"
            ),
            params![checkpoint_id.0],
            assignment_from_row,
        )
        .optional()?)
}

/// Assignments filtered by status and by the room of their checkpoint,
/// oldest first.
pub fn list(
    conn: &Connection,
    status: Option<AssignmentStatus>,
    room_id: Option<RoomId>,
) -> Result<Vec<QuestionAssignment>, StorageError> {
    let columns = ASSIGNMENT_COLUMNS
        .split(", ")
        .map(|c| format!("a.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {columns} FROM question_assignments a
         JOIN checkpoints c ON c.id = a.checkpoint_id
         WHERE (?1 IS NULL OR a.status = ?1) AND (?2 IS NULL OR c.room_id = ?2)
         ORDER BY a.id"
    ))?;
    let rows = stmt.query_map(
        params![status.map(|s| s.as_str()), room_id.map(|r| r.0)],
        assignment_from_row,
    )?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Stores a participant's answer. Resubmitting overwrites until marked.
pub fn submit(
    conn: &Connection,
    id: AssignmentId,
    answer: &str,
    at: DateTime<Utc>,
) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE question_assignments SET status = 'submitted', answer_text = ?2, submitted_at = ?3
         WHERE id = ?1 AND status IN ('assigned', 'submitted')",
        params![id.0, answer, at],
    )?;
    expect_one(changed, || format!("assignment {id} is already marked"))
}

/// Marks the answer. Allowed from `assigned` (answer given verbally) or
/// `submitted`.
pub fn mark(
    conn: &Connection,
    id: AssignmentId,
    correct: bool,
    by: UserId,
    at: DateTime<Utc>,
) -> Result<(), StorageError> {
    let status = if correct {
        AssignmentStatus::Correct
    } else {
        AssignmentStatus::Incorrect
    };
    let changed = conn.execute(
        "UPDATE question_assignments SET status = ?2, marked_at = ?3, marked_by = ?4
         WHERE id = ?1 AND status IN ('assigned', 'submitted')",
        params![id.0, status.as_str(), at, by.0],
    )?;
    expect_one(changed, || format!("assignment {id} is already marked"))
}

/// Flags the hint as revealed. Fails if it already was.
pub fn use_hint(conn: &Connection, id: AssignmentId) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE question_assignments SET hint_used = 1
         WHERE id = ?1 AND hint_used = 0 AND status IN ('assigned', 'submitted')",
        params![id.0],
    )?;
    expect_one(changed, || format!("hint for assignment {id} is unavailable"))
}
