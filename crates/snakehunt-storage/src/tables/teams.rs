//! `teams` table: board position, room and roll permission.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use snakehunt_core::model::Team;
use snakehunt_core::{MapId, RoomId, TeamId, START_TILE};

use super::expect_one;
use crate::convert::{team_from_row, TEAM_COLUMNS};
use crate::error::StorageError;

pub fn insert(conn: &Connection, name: &str, map_id: Option<MapId>) -> Result<TeamId, StorageError> {
    conn.execute(
        "INSERT INTO teams (name, map_id, position, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, map_id.map(|m| m.0), START_TILE, Utc::now()],
    )
    .map_err(|e| StorageError::on_unique(e, "team"))?;
    Ok(TeamId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: TeamId) -> Result<Team, StorageError> {
    conn.query_row(
        &format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?1"),
        params![id.0],
        team_from_row,
    )
    .optional()?
    .ok_or(StorageError::NotFound {
        entity: "team",
        id: id.0,
    })
}

pub fn list(conn: &Connection) -> Result<Vec<Team>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY id"))?;
    let rows = stmt.query_map([], team_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Where a roll leaves a team.
#[derive(Debug, Clone, Copy)]
pub struct MoveRecord {
    pub position: u32,
    pub room_id: Option<RoomId>,
    pub finished: bool,
    pub at: DateTime<Utc>,
}

/// Stores the result of a roll and locks further rolls.
///
/// Only succeeds while the team may roll, so two racing rolls cannot both
/// land. `started_at` is set by the first roll only.
pub fn record_move(conn: &Connection, id: TeamId, mv: &MoveRecord) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE teams SET
             position = ?2,
             current_room_id = ?3,
             can_roll = 0,
             last_moved_at = ?4,
             started_at = COALESCE(started_at, ?4),
             finished_at = CASE WHEN ?5 THEN ?4 ELSE NULL END
         WHERE id = ?1 AND can_roll = 1 AND finished_at IS NULL",
        params![id.0, mv.position, mv.room_id.map(|r| r.0), mv.at, mv.finished],
    )?;
    expect_one(changed, || format!("team {id} may not roll"))
}

/// Unlocks rolling once a checkpoint is completed. Finished teams stay locked.
pub fn unlock_roll(conn: &Connection, id: TeamId) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE teams SET can_roll = 1 WHERE id = ?1 AND finished_at IS NULL",
        params![id.0],
    )?;
    expect_one(changed, || format!("team {id} is finished or missing"))
}

pub fn add_penalty(conn: &Connection, id: TeamId, seconds: i64) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE teams SET penalty_seconds = penalty_seconds + ?2 WHERE id = ?1",
        params![id.0, seconds],
    )?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "team",
            id: id.0,
        });
    }
    Ok(())
}

pub fn increment_hints(conn: &Connection, id: TeamId) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE teams SET hints_used = hints_used + 1 WHERE id = ?1",
        params![id.0],
    )?;
    Ok(())
}

/// Wipes a team's history and puts it back on the start tile.
///
/// Deleting the rolls cascades to checkpoints and their assignments. Room
/// and map counters are the caller's responsibility.
pub fn reset(conn: &Connection, id: TeamId) -> Result<(), StorageError> {
    conn.execute("DELETE FROM time_logs WHERE team_id = ?1", params![id.0])?;
    conn.execute("DELETE FROM dice_rolls WHERE team_id = ?1", params![id.0])?;
    let changed = conn.execute(
        "UPDATE teams SET
             position = ?2,
             current_room_id = NULL,
             can_roll = 1,
             hints_used = 0,
             penalty_seconds = 0,
             started_at = NULL,
             finished_at = NULL,
             last_moved_at = NULL
         WHERE id = ?1",
        params![id.0, START_TILE],
    )?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "team",
            id: id.0,
        });
    }
    Ok(())
}

/// Deletes a team; its users, rolls, checkpoints and logs cascade.
pub fn delete(conn: &Connection, id: TeamId) -> Result<(), StorageError> {
    let changed = conn.execute("DELETE FROM teams WHERE id = ?1", params![id.0])?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "team",
            id: id.0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::open_in_memory;
    use crate::tables::rooms;

    #[test]
    fn new_team_starts_on_tile_one() {
        let conn = open_in_memory().unwrap();
        let id = insert(&conn, "alpha", None).unwrap();
        let team = get(&conn, id).unwrap();
        assert_eq!(team.position, START_TILE);
        assert!(team.can_roll);
        assert!(team.started_at.is_none());
    }

    #[test]
    fn record_move_locks_rolling() {
        let conn = open_in_memory().unwrap();
        let room = rooms::insert(&conn, "lab", 2).unwrap();
        let id = insert(&conn, "alpha", None).unwrap();
        let first = Utc::now();
        let mv = MoveRecord {
            position: 5,
            room_id: Some(room),
            finished: false,
            at: first,
        };
        record_move(&conn, id, &mv).unwrap();

        let team = get(&conn, id).unwrap();
        assert_eq!(team.position, 5);
        assert_eq!(team.current_room_id, Some(room));
        assert!(!team.can_roll);
        assert_eq!(team.started_at, Some(first));

        // A second move without unlocking is refused.
        assert!(record_move(&conn, id, &mv).is_err());

        unlock_roll(&conn, id).unwrap();
        let later = MoveRecord {
            position: 9,
            at: first + chrono::Duration::seconds(30),
            ..mv
        };
        record_move(&conn, id, &later).unwrap();
        let team = get(&conn, id).unwrap();
        assert_eq!(team.started_at, Some(first));
        assert_eq!(team.last_moved_at, Some(later.at));
    }

    #[test]
    fn finished_team_cannot_be_unlocked() {
        let conn = open_in_memory().unwrap();
        let id = insert(&conn, "alpha", None).unwrap();
        let mv = MoveRecord {
            position: 150,
            room_id: None,
            finished: true,
            at: Utc::now(),
        };
        record_move(&conn, id, &mv).unwrap();
        assert!(get(&conn, id).unwrap().is_finished());
        assert!(unlock_roll(&conn, id).is_err());
    }

    #[test]
    fn reset_clears_progress() {
        let conn = open_in_memory().unwrap();
        let id = insert(&conn, "alpha", None).unwrap();
        let mv = MoveRecord {
            position: 150,
            room_id: None,
            finished: true,
            at: Utc::now(),
        };
        record_move(&conn, id, &mv).unwrap();
        add_penalty(&conn, id, 90).unwrap();
        increment_hints(&conn, id).unwrap();

        reset(&conn, id).unwrap();
        let team = get(&conn, id).unwrap();
        assert_eq!(team.position, START_TILE);
        assert!(team.can_roll);
        assert_eq!(team.penalty_seconds, 0);
        assert_eq!(team.hints_used, 0);
        assert!(!team.is_finished());
    }

    #[test]
    fn duplicate_team_name() {
        let conn = open_in_memory().unwrap();
        insert(&conn, "alpha", None).unwrap();
        assert!(matches!(
            insert(&conn, "alpha", None).unwrap_err(),
            StorageError::Duplicate { entity: "team", .. }
        ));
    }
}
