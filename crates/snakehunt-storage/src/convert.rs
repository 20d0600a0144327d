//! Row <-> entity conversion.
//!
//! Each entity has a column list constant and a `*_from_row` function that
//! reads columns by position in that order. Enum columns are TEXT holding
//! the enum's `as_str` form.

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::Row;

use snakehunt_core::model::{
    BoardMap, BoardRule, Checkpoint, DiceRoll, Question, QuestionAssignment, Room, Team, TimeLog,
    User,
};
use snakehunt_core::CoreError;

/// Reads a TEXT column and parses it into a text enum.
fn text_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = CoreError>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Like [`text_enum`] for nullable columns.
fn opt_text_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr<Err = CoreError>,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

pub(crate) const MAP_COLUMNS: &str = "id, name, max_teams, assigned_teams, is_active, created_at";

pub(crate) fn map_from_row(row: &Row<'_>) -> rusqlite::Result<BoardMap> {
    Ok(BoardMap {
        id: row.get::<_, i64>(0)?.into(),
        name: row.get(1)?,
        max_teams: row.get(2)?,
        assigned_teams: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub(crate) const RULE_COLUMNS: &str = "id, map_id, kind, start_tile, end_tile";

pub(crate) fn rule_from_row(row: &Row<'_>) -> rusqlite::Result<BoardRule> {
    Ok(BoardRule {
        id: row.get::<_, i64>(0)?.into(),
        map_id: row.get::<_, i64>(1)?.into(),
        kind: text_enum(row, 2)?,
        start_tile: row.get(3)?,
        end_tile: row.get(4)?,
    })
}

pub(crate) const ROOM_COLUMNS: &str = "id, name, capacity, occupancy, is_active, created_at";

pub(crate) fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get::<_, i64>(0)?.into(),
        name: row.get(1)?,
        capacity: row.get(2)?,
        occupancy: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub(crate) const TEAM_COLUMNS: &str = "id, name, map_id, position, current_room_id, can_roll, \
     hints_used, penalty_seconds, started_at, finished_at, last_moved_at, created_at";

pub(crate) fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get::<_, i64>(0)?.into(),
        name: row.get(1)?,
        map_id: row.get::<_, Option<i64>>(2)?.map(Into::into),
        position: row.get(3)?,
        current_room_id: row.get::<_, Option<i64>>(4)?.map(Into::into),
        can_roll: row.get(5)?,
        hints_used: row.get(6)?,
        penalty_seconds: row.get(7)?,
        started_at: row.get(8)?,
        finished_at: row.get(9)?,
        last_moved_at: row.get(10)?,
        created_at: row.get(11)?,
    })
}

pub(crate) const USER_COLUMNS: &str =
    "id, username, password_hash, role, team_id, room_id, created_at";

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get::<_, i64>(0)?.into(),
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role: text_enum(row, 3)?,
        team_id: row.get::<_, Option<i64>>(4)?.map(Into::into),
        room_id: row.get::<_, Option<i64>>(5)?.map(Into::into),
        created_at: row.get(6)?,
    })
}

pub(crate) const QUESTION_COLUMNS: &str =
    "id, kind, prompt, answer, hint, is_snake, is_active, created_at";

pub(crate) fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get::<_, i64>(0)?.into(),
        kind: text_enum(row, 1)?,
        prompt: row.get(2)?,
        answer: row.get(3)?,
        hint: row.get(4)?,
        is_snake: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub(crate) const ROLL_COLUMNS: &str = "id, team_id, value, from_position, landed_position, \
     final_position, rule_kind, room_id, created_at";

pub(crate) fn roll_from_row(row: &Row<'_>) -> rusqlite::Result<DiceRoll> {
    Ok(DiceRoll {
        id: row.get::<_, i64>(0)?.into(),
        team_id: row.get::<_, i64>(1)?.into(),
        value: row.get(2)?,
        from_position: row.get(3)?,
        landed_position: row.get(4)?,
        final_position: row.get(5)?,
        rule_kind: opt_text_enum(row, 6)?,
        room_id: row.get::<_, Option<i64>>(7)?.map(Into::into),
        created_at: row.get(8)?,
    })
}

pub(crate) const CHECKPOINT_COLUMNS: &str = "id, team_id, roll_id, room_id, position, is_snake, \
     status, created_at, approved_at, approved_by, completed_at";

pub(crate) fn checkpoint_from_row(row: &Row<'_>) -> rusqlite::Result<Checkpoint> {
    Ok(Checkpoint {
        id: row.get::<_, i64>(0)?.into(),
        team_id: row.get::<_, i64>(1)?.into(),
        roll_id: row.get::<_, i64>(2)?.into(),
        room_id: row.get::<_, i64>(3)?.into(),
        position: row.get(4)?,
        is_snake: row.get(5)?,
        status: text_enum(row, 6)?,
        created_at: row.get(7)?,
        approved_at: row.get(8)?,
        approved_by: row.get::<_, Option<i64>>(9)?.map(Into::into),
        completed_at: row.get(10)?,
    })
}

pub(crate) const ASSIGNMENT_COLUMNS: &str = "id, checkpoint_id, team_id, question_id, status, \
     answer_text, hint_used, assigned_at, submitted_at, marked_at, marked_by";

pub(crate) fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<QuestionAssignment> {
    Ok(QuestionAssignment {
        id: row.get::<_, i64>(0)?.into(),
        checkpoint_id: row.get::<_, i64>(1)?.into(),
        team_id: row.get::<_, i64>(2)?.into(),
        question_id: row.get::<_, i64>(3)?.into(),
        status: text_enum(row, 4)?,
        answer_text: row.get(5)?,
        hint_used: row.get(6)?,
        assigned_at: row.get(7)?,
        submitted_at: row.get(8)?,
        marked_at: row.get(9)?,
        marked_by: row.get::<_, Option<i64>>(10)?.map(Into::into),
    })
}

pub(crate) const TIME_LOG_COLUMNS: &str =
    "id, team_id, seconds, reason, note, created_by, created_at";

pub(crate) fn time_log_from_row(row: &Row<'_>) -> rusqlite::Result<TimeLog> {
    Ok(TimeLog {
        id: row.get::<_, i64>(0)?.into(),
        team_id: row.get::<_, i64>(1)?.into(),
        seconds: row.get(2)?,
        reason: text_enum(row, 3)?,
        note: row.get(4)?,
        created_by: row.get::<_, Option<i64>>(5)?.map(Into::into),
        created_at: row.get(6)?,
    })
}
