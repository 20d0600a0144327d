//! `questions` table: the question bank.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use snakehunt_core::model::Question;
use snakehunt_core::{QuestionId, TeamId};

use crate::convert::{question_from_row, QUESTION_COLUMNS};
use crate::error::StorageError;
use crate::types::{NewQuestion, QuestionUpdate};

pub fn insert(conn: &Connection, question: &NewQuestion) -> Result<QuestionId, StorageError> {
    conn.execute(
        "INSERT INTO questions (kind, prompt, answer, hint, is_snake, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            question.kind.as_str(),
            question.prompt,
            question.answer,
            question.hint,
            question.is_snake,
            Utc::now(),
        ],
    )?;
    Ok(QuestionId(conn.last_insert_rowid()))
}

pub fn get(conn: &Connection, id: QuestionId) -> Result<Question, StorageError> {
    conn.query_row(
        &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1"),
        params![id.0],
        question_from_row,
    )
    .optional()?
    .ok_or(StorageError::NotFound {
        entity: "question",
        id: id.0,
    })
}

pub fn list(conn: &Connection) -> Result<Vec<Question>, StorageError> {
    let mut stmt =
        conn.prepare_cached(&format!("SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id"))?;
    let rows = stmt.query_map([], question_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

/// Active questions the team has never been assigned.
pub fn unseen_active(conn: &Connection, team_id: TeamId) -> Result<Vec<Question>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions
         WHERE is_active = 1
           AND id NOT IN (SELECT question_id FROM question_assignments WHERE team_id = ?1)
         ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![team_id.0], question_from_row)?;
    Ok(rows.collect::<Result<_, _>>()?)
}

pub fn update(
    conn: &Connection,
    id: QuestionId,
    update: &QuestionUpdate,
) -> Result<Question, StorageError> {
    let current = get(conn, id)?;
    let hint = match &update.hint {
        Some(hint) => hint.clone(),
        None => current.hint.clone(),
    };
    conn.execute(
        "UPDATE questions SET prompt = ?2, answer = ?3, hint = ?4, is_snake = ?5, is_active = ?6
         WHERE id = ?1",
        params![
            id.0,
            update.prompt.as_deref().unwrap_or(&current.prompt),
            update.answer.as_deref().unwrap_or(&current.answer),
            hint,
            update.is_snake.unwrap_or(current.is_snake),
            update.is_active.unwrap_or(current.is_active),
        ],
    )?;
    get(conn, id)
}
