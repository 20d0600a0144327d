//! SQLite persistence for snakehunt.
//!
//! [`SqliteStore`] owns the connection. Row access lives in [`tables`], one
//! module per table, as free functions over `&rusqlite::Connection` so the
//! same call works inside or outside a transaction.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: insert and update payloads
//! - [`schema`]: migrations and connection setup
//! - [`sqlite`]: SqliteStore
//! - [`tables`]: per-table queries

mod convert;
pub mod error;
pub mod schema;
pub mod sqlite;
pub mod tables;
pub mod types;

pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use types::{NewQuestion, NewRule, NewUser, QuestionUpdate, RoomUpdate};
