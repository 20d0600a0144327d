//! Game rules for a room-based Snake & Ladders event.
//!
//! Everything here is pure: no I/O, no clock reads beyond what callers pass
//! in, and randomness only through a caller-supplied `Rng`.
//!
//! # Modules
//!
//! - [`id`]: entity ID newtypes
//! - [`types`]: roles, question kinds, rule kinds, lifecycle states
//! - [`model`]: persistent entities
//! - [`board`]: dice, movement, snakes and ladders
//! - [`rooms`]: room and map placement
//! - [`questions`]: weighted question selection
//! - [`leaderboard`]: ranking
//! - [`error`]: CoreError

pub mod board;
pub mod error;
pub mod id;
pub mod leaderboard;
pub mod model;
pub mod questions;
pub mod rooms;
pub mod types;

// Re-export commonly used types
pub use board::{Board, MoveOutcome, BOARD_SIZE, DICE_FACES, START_TILE};
pub use error::CoreError;
pub use id::{
    AssignmentId, CheckpointId, MapId, QuestionId, RoomId, RollId, RuleId, TeamId, TimeLogId,
    UserId,
};
pub use leaderboard::LeaderboardEntry;
pub use questions::{answers_match, KindWeights, QuestionPick};
pub use types::{
    AssignmentStatus, CheckpointStatus, QuestionKind, Role, RuleKind, TimeLogReason,
};
