//! One module per table.
//!
//! Every function takes a `&Connection`, so it runs equally against the
//! store's connection or inside a [`rusqlite::Transaction`]. Writes that
//! guard a state transition put the expected state in the `WHERE` clause
//! and report [`StorageError::IntegrityError`](crate::StorageError) when no
//! row matched.

pub mod assignments;
pub mod checkpoints;
pub mod maps;
pub mod questions;
pub mod rolls;
pub mod rooms;
pub mod teams;
pub mod time_logs;
pub mod users;

use crate::error::StorageError;

/// Turns an `UPDATE`'s affected-row count into an error when nothing matched.
pub(crate) fn expect_one(changed: usize, reason: impl FnOnce() -> String) -> Result<(), StorageError> {
    if changed == 0 {
        Err(StorageError::IntegrityError { reason: reason() })
    } else {
        Ok(())
    }
}
