//! Storage error types for snakehunt-storage.
//!
//! [`StorageError`] covers the failure modes of the storage layer: SQLite
//! failures, migrations, missing rows, and constraint violations.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An underlying SQLite call failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A row with the given ID was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A unique constraint rejected the write.
    #[error("{entity} already exists: {detail}")]
    Duplicate { entity: &'static str, detail: String },

    /// A data integrity rule was violated.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}

impl StorageError {
    /// Converts a unique-constraint failure into [`StorageError::Duplicate`];
    /// every other error passes through unchanged.
    pub fn on_unique(err: rusqlite::Error, entity: &'static str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StorageError::Duplicate {
                    entity,
                    detail: msg.clone().unwrap_or_else(|| "unique constraint".to_string()),
                }
            }
            _ => StorageError::Sqlite(err),
        }
    }
}
