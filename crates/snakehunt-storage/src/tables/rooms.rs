//! `rooms` table: physical rooms and their occupancy counters.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use snakehunt_core::model::Room;
use snakehunt_core::RoomId;

use super::expect_one;
use crate::convert::{room_from_row, ROOM_COLUMNS};
use crate::error::StorageError;
use crate::types::RoomUpdate;

pub fn insert(conn: &Connection, name: &str, capacity: u32) -> Result<RoomId, StorageError> {
    conn.execute(
        "INSERT INTO rooms (name, capacity, created_at) VALUES (?1, ?2, ?3)",
        params![name, capacity, Utc::now()],
    )
    .map_err(|e| StorageError::on_unique(e, "room"))?;
    Ok(RoomId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: RoomId) -> Result<Room, StorageError> {
    conn.query_row(
        &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?1"),
        params![id.0],
        room_from_row,
    )
    .optional()?
    .ok_or(StorageError::NotFound {
        entity: "room",
        id: id.0,
    })
}

pub fn list(conn: &Connection) -> Result<Vec<Room>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {ROOM_COLUMNS} FROM rooms ORDER BY id"))?;
    let rows = stmt.query_map([], room_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Applies a partial update. Capacity may not drop below occupancy.
pub fn update(conn: &Connection, id: RoomId, update: &RoomUpdate) -> Result<Room, StorageError> {
    let current = get(conn, id)?;
    let capacity = update.capacity.unwrap_or(current.capacity);
    if capacity < current.occupancy {
        return Err(StorageError::IntegrityError {
            reason: format!(
                "room {} holds {} teams; capacity {} is too small",
                id, current.occupancy, capacity
            ),
        });
    }
    conn.execute(
        "UPDATE rooms SET name = ?2, capacity = ?3, is_active = ?4 WHERE id = ?1",
        params![
            id.0,
            update.name.as_deref().unwrap_or(&current.name),
            capacity,
            update.is_active.unwrap_or(current.is_active),
        ],
    )
    .map_err(|e| StorageError::on_unique(e, "room"))?;
    get(conn, id)
}

/// Counts one more team into the room. Fails when the room is full or closed.
pub fn occupy(conn: &Connection, id: RoomId) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE rooms SET occupancy = occupancy + 1
         WHERE id = ?1 AND is_active = 1 AND occupancy < capacity",
        params![id.0],
    )?;
    expect_one(changed, || format!("room {id} has no space"))
}

/// Counts one team out of the room. Never goes below zero.
pub fn release(conn: &Connection, id: RoomId) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE rooms SET occupancy = MAX(occupancy - 1, 0) WHERE id = ?1",
        params![id.0],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::open_in_memory;

    #[test]
    fn insert_and_get() {
        let conn = open_in_memory().unwrap();
        let id = insert(&conn, "library", 2).unwrap();
        let room = get(&conn, id).unwrap();
        assert_eq!(room.name, "library");
        assert_eq!(room.capacity, 2);
        assert_eq!(room.occupancy, 0);
        assert!(room.is_active);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let conn = open_in_memory().unwrap();
        insert(&conn, "library", 2).unwrap();
        let err = insert(&conn, "library", 5).unwrap_err();
        assert!(matches!(err, StorageError::Duplicate { entity: "room", .. }));
    }

    #[test]
    fn occupy_respects_capacity() {
        let conn = open_in_memory().unwrap();
        let id = insert(&conn, "lab", 1).unwrap();
        occupy(&conn, id).unwrap();
        assert!(matches!(
            occupy(&conn, id).unwrap_err(),
            StorageError::IntegrityError { .. }
        ));
        release(&conn, id).unwrap();
        release(&conn, id).unwrap();
        assert_eq!(get(&conn, id).unwrap().occupancy, 0);
    }

    #[test]
    fn capacity_cannot_drop_below_occupancy() {
        let conn = open_in_memory().unwrap();
        let id = insert(&conn, "lab", 3).unwrap();
        occupy(&conn, id).unwrap();
        occupy(&conn, id).unwrap();
        let shrink = RoomUpdate {
            capacity: Some(1),
            ..Default::default()
        };
        assert!(update(&conn, id, &shrink).is_err());
        let close = RoomUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        let room = update(&conn, id, &close).unwrap();
        assert!(!room.is_active);
        assert_eq!(room.capacity, 3);
    }

    #[test]
    fn missing_room() {
        let conn = open_in_memory().unwrap();
        assert!(matches!(
            get(&conn, RoomId(9)).unwrap_err(),
            StorageError::NotFound { entity: "room", id: 9 }
        ));
    }
}
