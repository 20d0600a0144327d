//! `time_logs` table: signed clock adjustments.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use snakehunt_core::model::TimeLog;
use snakehunt_core::{TeamId, TimeLogId, TimeLogReason, UserId};

use crate::convert::{time_log_from_row, TIME_LOG_COLUMNS};
use crate::error::StorageError;

/// Fields of a new time log entry.
#[derive(Debug, Clone)]
pub struct NewTimeLog {
    pub team_id: TeamId,
    pub seconds: i64,
    pub reason: TimeLogReason,
    pub note: Option<String>,
    pub created_by: Option<UserId>,
}

/// Appends a log entry and adds it to the team's running penalty total.
pub fn record(
    conn: &Connection,
    entry: &NewTimeLog,
    at: DateTime<Utc>,
) -> Result<TimeLogId, StorageError> {
    conn.execute(
        "INSERT INTO time_logs (team_id, seconds, reason, note, created_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.team_id.0,
            entry.seconds,
            entry.reason.as_str(),
            entry.note,
            entry.created_by.map(|u| u.0),
            at,
        ],
    )?;
    let id = TimeLogId(conn.last_insert_rowid());
    super::teams::add_penalty(conn, entry.team_id, entry.seconds)?;
    Ok(id)
}

pub fn list_for_team(conn: &Connection, team_id: TeamId) -> Result<Vec<TimeLog>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {TIME_LOG_COLUMNS} FROM time_logs WHERE team_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![team_id.0], time_log_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub fn total_for_team(conn: &Connection, team_id: TeamId) -> Result<i64, StorageError> {
    Ok(conn.query_row(
        "SELECT COALESCE(SUM(seconds), 0) FROM time_logs WHERE team_id = ?1",
        params![team_id.0],
        |row| row.get(0),
    )?)
}
