//! `users` table: accounts and their team or room binding.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use snakehunt_core::model::User;
use snakehunt_core::UserId;

use crate::convert::{user_from_row, USER_COLUMNS};
use crate::error::StorageError;
use crate::types::NewUser;

pub fn insert(conn: &Connection, user: &NewUser) -> Result<UserId, StorageError> {
    conn.execute(
        "INSERT INTO users (username, password_hash, role, team_id, room_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.username,
            user.password_hash,
            user.role.as_str(),
            user.team_id.map(|t| t.0),
            user.room_id.map(|r| r.0),
            Utc::now(),
        ],
    )
    .map_err(|e| StorageError::on_unique(e, "user"))?;
    Ok(UserId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: UserId) -> Result<User, StorageError> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id.0],
        user_from_row,
    )
    .optional()?
    .ok_or(StorageError::NotFound {
        entity: "user",
        id: id.0,
    })
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>, StorageError> {
    Ok(conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()?)
}

pub fn list(conn: &Connection) -> Result<Vec<User>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
    let rows = stmt.query_map([], user_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use snakehunt_core::Role;

    use super::*;
    use crate::schema::open_in_memory;
    use crate::tables::teams;

    fn participant(name: &str, team: Option<snakehunt_core::TeamId>) -> NewUser {
        NewUser {
            username: name.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Participant,
            team_id: team,
            room_id: None,
        }
    }

    #[test]
    fn lookup_by_username() {
        let conn = open_in_memory().unwrap();
        let team = teams::insert(&conn, "alpha", None).unwrap();
        let id = insert(&conn, &participant("ana", Some(team))).unwrap();

        let user = find_by_username(&conn, "ana").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Participant);
        assert_eq!(user.team_id, Some(team));
        assert!(find_by_username(&conn, "bob").unwrap().is_none());
        assert_eq!(count(&conn).unwrap(), 1);
    }

    #[test]
    fn deleting_team_removes_its_participants() {
        let conn = open_in_memory().unwrap();
        let team = teams::insert(&conn, "alpha", None).unwrap();
        insert(&conn, &participant("ana", Some(team))).unwrap();
        teams::delete(&conn, team).unwrap();
        assert_eq!(count(&conn).unwrap(), 0);
    }

    #[test]
    fn unique_username() {
        let conn = open_in_memory().unwrap();
        insert(&conn, &participant("ana", None)).unwrap();
        assert!(matches!(
            insert(&conn, &participant("ana", None)).unwrap_err(),
            StorageError::Duplicate { entity: "user", .. }
        ));
    }
}
