//! Stable ID newtypes for game entities.
//!
//! All IDs are distinct newtype wrappers over `i64`, matching SQLite's
//! `INTEGER PRIMARY KEY`, so that a `TeamId` cannot be accidentally used
//! where a `RoomId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub i64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<i64> for $name {
                fn from(raw: i64) -> Self {
                    $name(raw)
                }
            }
        )*
    };
}

entity_id! {
    /// Team identity.
    TeamId,
    /// Login account identity.
    UserId,
    /// Physical room identity.
    RoomId,
    /// Board variant identity.
    MapId,
    /// Snake or ladder identity.
    RuleId,
    /// Question bank entry identity.
    QuestionId,
    /// Checkpoint (one per non-final roll) identity.
    CheckpointId,
    /// Question assignment identity.
    AssignmentId,
    /// Dice roll identity.
    RollId,
    /// Time log entry identity.
    TimeLogId,
}
