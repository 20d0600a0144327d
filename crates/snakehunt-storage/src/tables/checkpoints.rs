//! `checkpoints` table: one row per non-final roll.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use snakehunt_core::model::Checkpoint;
use snakehunt_core::{CheckpointId, CheckpointStatus, RollId, RoomId, TeamId, UserId};

use super::expect_one;
use crate::convert::{checkpoint_from_row, CHECKPOINT_COLUMNS};
use crate::error::StorageError;

/// Fields of a freshly created checkpoint.
#[derive(Debug, Clone, Copy)]
pub struct NewCheckpoint {
    pub team_id: TeamId,
    pub roll_id: RollId,
    pub room_id: RoomId,
    pub position: u32,
    pub is_snake: bool,
}

/// Inserts a pending checkpoint. The partial unique index rejects a second
/// open checkpoint for the same team.
pub fn insert(
    conn: &Connection,
    new: &NewCheckpoint,
    at: DateTime<Utc>,
) -> Result<CheckpointId, StorageError> {
    conn.execute(
        "INSERT INTO checkpoints (team_id, roll_id, room_id, position, is_snake, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            new.team_id.0,
            new.roll_id.0,
            new.room_id.0,
            new.position,
            new.is_snake,
            CheckpointStatus::Pending.as_str(),
            at,
        ],
    )
    .map_err(|e| StorageError::on_unique(e, "open checkpoint"))?;
    Ok(CheckpointId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: CheckpointId) -> Result<Checkpoint, StorageError> {
    conn.query_row(
        &format!("SELECT {CHECKPOINT_COLUMNS} FROM checkpoints WHERE id = ?1"),
        params![id.0],
        checkpoint_from_row,
    )
    .optional()?
    .ok_or(StorageError::NotFound {
        entity: "checkpoint",
        id: id.0,
    })
}

/// The team's pending or approved checkpoint, if any.
pub fn open_for_team(
    conn: &Connection,
    team_id: TeamId,
) -> Result<Option<Checkpoint>, StorageError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {CHECKPOINT_COLUMNS} FROM checkpoints
                 WHERE team_id = ?1 AND status != 'completed'"
            ),
            params![team_id.0],
            checkpoint_from_row,
        )
        .optional()?)
}

/// Checkpoints filtered by status and room, oldest first.
pub fn list(
    conn: &Connection,
    status: Option<CheckpointStatus>,
    room_id: Option<RoomId>,
) -> Result<Vec<Checkpoint>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CHECKPOINT_COLUMNS} FROM checkpoints
         WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR room_id = ?2)
         ORDER BY id"
    ))?;
    let rows = stmt.query_map(
        params![status.map(|s| s.as_str()), room_id.map(|r| r.0)],
        checkpoint_from_row,
    )?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub fn list_for_team(
    conn: &Connection,
    team_id: TeamId,
) -> Result<Vec<Checkpoint>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CHECKPOINT_COLUMNS} FROM checkpoints WHERE team_id = ?1 ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map(params![team_id.0], checkpoint_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// `pending -> approved`.
pub fn approve(
    conn: &Connection,
    id: CheckpointId,
    by: UserId,
    at: DateTime<Utc>,
) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE checkpoints SET status = 'approved', approved_at = ?2, approved_by = ?3
         WHERE id = ?1 AND status = 'pending'",
        params![id.0, at, by.0],
    )?;
    expect_one(changed, || format!("checkpoint {id} is not pending"))
}

/// `approved -> completed`.
pub fn complete(conn: &Connection, id: CheckpointId, at: DateTime<Utc>) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE checkpoints SET status = 'completed', completed_at = ?2
         WHERE id = ?1 AND status = 'approved'",
        params![id.0, at],
    )?;
    expect_one(changed, || format!("checkpoint {id} is not approved"))
}
