//! SQLite connection owner.
//!
//! [`SqliteStore`] owns the single connection used by the service. Reads go
//! through [`SqliteStore::conn`]; every state change goes through
//! [`SqliteStore::transaction`] so a failed step rolls the whole operation
//! back.

use rusqlite::{Connection, Transaction};

use crate::error::StorageError;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Runs `f` inside a transaction. Commits when `f` returns `Ok`; the
    /// transaction is rolled back on drop otherwise.
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StorageError>,
    {
        let tx = self.conn.transaction().map_err(StorageError::from)?;
        let out = f(&tx)?;
        tx.commit().map_err(StorageError::from)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use snakehunt_core::RoomId;

    use super::*;
    use crate::tables::rooms;

    #[test]
    fn transaction_commits_on_ok() {
        let mut store = SqliteStore::in_memory().unwrap();
        let id = store
            .transaction(|tx| rooms::insert(tx, "lab", 3))
            .unwrap();
        assert_eq!(rooms::get(store.conn(), id).unwrap().name, "lab");
    }

    #[test]
    fn transaction_rolls_back_on_err() {
        let mut store = SqliteStore::in_memory().unwrap();
        let result: Result<RoomId, StorageError> = store.transaction(|tx| {
            rooms::insert(tx, "lab", 3)?;
            Err(StorageError::IntegrityError {
                reason: "abort".into(),
            })
        });
        assert!(result.is_err());
        assert!(rooms::list(store.conn()).unwrap().is_empty());
    }
}
