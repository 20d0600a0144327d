//! `dice_rolls` table: append-only roll history.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use snakehunt_core::model::DiceRoll;
use snakehunt_core::{MoveOutcome, RollId, RoomId, TeamId};

use crate::convert::{roll_from_row, ROLL_COLUMNS};
use crate::error::StorageError;

pub fn insert(
    conn: &Connection,
    team_id: TeamId,
    outcome: &MoveOutcome,
    room_id: Option<RoomId>,
    at: DateTime<Utc>,
) -> Result<RollId, StorageError> {
    conn.execute(
        "INSERT INTO dice_rolls
             (team_id, value, from_position, landed_position, final_position, rule_kind, room_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            team_id.0,
            outcome.dice,
            outcome.from,
            outcome.landed,
            outcome.final_position,
            outcome.rule.map(|k| k.as_str()),
            room_id.map(|r| r.0),
            at,
        ],
    )?;
    Ok(RollId(conn.last_insert_rowid()))
}

/// A team's rolls, newest first.
pub fn list_for_team(conn: &Connection, team_id: TeamId) -> Result<Vec<DiceRoll>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {ROLL_COLUMNS} FROM dice_rolls WHERE team_id = ?1 ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map(params![team_id.0], roll_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

#[cfg(test)]
mod tests {
    use snakehunt_core::RuleKind;

    use super::*;
    use crate::schema::open_in_memory;
    use crate::tables::teams;

    #[test]
    fn newest_first() {
        let conn = open_in_memory().unwrap();
        let team = teams::insert(&conn, "alpha", None).unwrap();
        let first = MoveOutcome {
            from: 1,
            dice: 3,
            landed: 4,
            final_position: 4,
            rule: None,
            finished: false,
        };
        let second = MoveOutcome {
            from: 4,
            dice: 6,
            landed: 10,
            final_position: 2,
            rule: Some(RuleKind::Snake),
            finished: false,
        };
        insert(&conn, team, &first, None, Utc::now()).unwrap();
        insert(&conn, team, &second, None, Utc::now()).unwrap();

        let rolls = list_for_team(&conn, team).unwrap();
        assert_eq!(rolls.len(), 2);
        assert_eq!(rolls[0].value, 6);
        assert_eq!(rolls[0].rule_kind, Some(RuleKind::Snake));
        assert_eq!(rolls[1].rule_kind, None);
    }
}
