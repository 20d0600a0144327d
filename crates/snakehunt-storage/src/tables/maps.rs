//! `board_maps` and `board_rules` tables.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use snakehunt_core::model::{BoardMap, BoardRule};
use snakehunt_core::{MapId, RuleId};

use super::expect_one;
use crate::convert::{map_from_row, rule_from_row, MAP_COLUMNS, RULE_COLUMNS};
use crate::error::StorageError;
use crate::types::NewRule;

pub fn insert(conn: &Connection, name: &str, max_teams: u32) -> Result<MapId, StorageError> {
    conn.execute(
        "INSERT INTO board_maps (name, max_teams, created_at) VALUES (?1, ?2, ?3)",
        params![name, max_teams, Utc::now()],
    )
    .map_err(|e| StorageError::on_unique(e, "map"))?;
    Ok(MapId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: MapId) -> Result<BoardMap, StorageError> {
    conn.query_row(
        &format!("SELECT {MAP_COLUMNS} FROM board_maps WHERE id = ?1"),
        params![id.0],
        map_from_row,
    )
    .optional()?
    .ok_or(StorageError::NotFound {
        entity: "map",
        id: id.0,
    })
}

pub fn list(conn: &Connection) -> Result<Vec<BoardMap>, StorageError> {
    let mut stmt =
        conn.prepare_cached(&format!("SELECT {MAP_COLUMNS} FROM board_maps ORDER BY id"))?;
    let rows = stmt.query_map([], map_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Counts a team onto the map. Fails when the map is full or inactive.
pub fn claim_slot(conn: &Connection, id: MapId) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE board_maps SET assigned_teams = assigned_teams + 1
         WHERE id = ?1 AND is_active = 1 AND assigned_teams < max_teams",
        params![id.0],
    )?;
    expect_one(changed, || format!("map {id} has no free slot"))
}

pub fn release_slot(conn: &Connection, id: MapId) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE board_maps SET assigned_teams = MAX(assigned_teams - 1, 0) WHERE id = ?1",
        params![id.0],
    )?;
    Ok(())
}

/// Rules of one map, ordered by start tile.
pub fn rules(conn: &Connection, map_id: MapId) -> Result<Vec<BoardRule>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {RULE_COLUMNS} FROM board_rules WHERE map_id = ?1 ORDER BY start_tile"
    ))?;
    let rows = stmt.query_map(params![map_id.0], rule_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Inserts a rule as given. Callers validate it against the map's board first.
pub fn insert_rule(conn: &Connection, map_id: MapId, rule: &NewRule) -> Result<RuleId, StorageError> {
    conn.execute(
        "INSERT INTO board_rules (map_id, kind, start_tile, end_tile) VALUES (?1, ?2, ?3, ?4)",
        params![map_id.0, rule.kind.as_str(), rule.start_tile, rule.end_tile],
    )
    .map_err(|e| StorageError::on_unique(e, "rule"))?;
    Ok(RuleId(conn.last_insert_rowid()))
}

pub fn get_rule(conn: &Connection, id: RuleId) -> Result<BoardRule, StorageError> {
    conn.query_row(
        &format!("SELECT {RULE_COLUMNS} FROM board_rules WHERE id = ?1"),
        params![id.0],
        rule_from_row,
    )
    .optional()?
    .ok_or(StorageError::NotFound {
        entity: "rule",
        id: id.0,
    })
}

pub fn delete_rule(conn: &Connection, id: RuleId) -> Result<(), StorageError> {
    let changed = conn.execute("DELETE FROM board_rules WHERE id = ?1", params![id.0])?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "rule",
            id: id.0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use snakehunt_core::RuleKind;

    use super::*;
    use crate::schema::open_in_memory;

    #[test]
    fn slots_are_bounded() {
        let conn = open_in_memory().unwrap();
        let id = insert(&conn, "classic", 1).unwrap();
        claim_slot(&conn, id).unwrap();
        assert!(claim_slot(&conn, id).is_err());
        release_slot(&conn, id).unwrap();
        assert_eq!(get(&conn, id).unwrap().assigned_teams, 0);
    }

    #[test]
    fn rules_round_trip_in_tile_order() {
        let conn = open_in_memory().unwrap();
        let map = insert(&conn, "classic", 4).unwrap();
        let ladder = NewRule {
            kind: RuleKind::Ladder,
            start_tile: 30,
            end_tile: 60,
        };
        let snake = NewRule {
            kind: RuleKind::Snake,
            start_tile: 20,
            end_tile: 5,
        };
        insert_rule(&conn, map, &ladder).unwrap();
        let snake_id = insert_rule(&conn, map, &snake).unwrap();

        let rules = rules(&conn, map).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].kind, RuleKind::Snake);
        assert_eq!(rules[1].end_tile, 60);

        delete_rule(&conn, snake_id).unwrap();
        assert!(matches!(
            delete_rule(&conn, snake_id).unwrap_err(),
            StorageError::NotFound { .. }
        ));
    }

    #[test]
    fn same_start_tile_twice_is_duplicate() {
        let conn = open_in_memory().unwrap();
        let map = insert(&conn, "classic", 4).unwrap();
        let rule = NewRule {
            kind: RuleKind::Snake,
            start_tile: 20,
            end_tile: 5,
        };
        insert_rule(&conn, map, &rule).unwrap();
        assert!(matches!(
            insert_rule(&conn, map, &rule).unwrap_err(),
            StorageError::Duplicate { .. }
        ));
    }
}
