//! Persistent game entities.
//!
//! These structs mirror the database rows one to one. They carry no
//! behavior beyond small derived queries; the state machine lives in the
//! server's service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{
    AssignmentId, CheckpointId, MapId, QuestionId, RoomId, RollId, RuleId, TeamId, TimeLogId,
    UserId,
};
use crate::types::{
    AssignmentStatus, CheckpointStatus, QuestionKind, Role, RuleKind, TimeLogReason,
};

/// A board variant with its own snakes and ladders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMap {
    pub id: MapId,
    pub name: String,
    /// Most teams that may be placed on this map.
    pub max_teams: u32,
    /// Teams currently placed on this map.
    pub assigned_teams: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl BoardMap {
    pub fn has_capacity(&self) -> bool {
        self.is_active && self.assigned_teams < self.max_teams
    }
}

/// A snake (down) or ladder (up) on a board map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRule {
    pub id: RuleId,
    pub map_id: MapId,
    pub kind: RuleKind,
    pub start_tile: u32,
    pub end_tile: u32,
}

/// A physical room that hosts checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub capacity: u32,
    /// Teams currently sent to this room.
    pub occupancy: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn has_space(&self) -> bool {
        self.is_active && self.occupancy < self.capacity
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub map_id: Option<MapId>,
    pub position: u32,
    pub current_room_id: Option<RoomId>,
    pub can_roll: bool,
    pub hints_used: u32,
    /// Sum of every time log for this team, in seconds.
    pub penalty_seconds: i64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub last_moved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Wall-clock seconds since the first roll, stopped at the finish.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        match self.started_at {
            Some(start) => {
                let end = self.finished_at.unwrap_or(now);
                (end - start).num_seconds().max(0)
            }
            None => 0,
        }
    }

    /// Elapsed time plus penalties.
    pub fn total_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.elapsed_seconds(now) + self.penalty_seconds
    }
}

/// A login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub team_id: Option<TeamId>,
    pub room_id: Option<RoomId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub kind: QuestionKind,
    pub prompt: String,
    pub answer: String,
    pub hint: Option<String>,
    /// Part of the snake pool, drawn only for snake checkpoints.
    pub is_snake: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub id: RollId,
    pub team_id: TeamId,
    pub value: u8,
    pub from_position: u32,
    pub landed_position: u32,
    pub final_position: u32,
    pub rule_kind: Option<RuleKind>,
    pub room_id: Option<RoomId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub team_id: TeamId,
    pub roll_id: RollId,
    pub room_id: RoomId,
    pub position: u32,
    /// The roll landed on a snake head.
    pub is_snake: bool,
    pub status: CheckpointStatus,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<UserId>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAssignment {
    pub id: AssignmentId,
    pub checkpoint_id: CheckpointId,
    pub team_id: TeamId,
    pub question_id: QuestionId,
    pub status: AssignmentStatus,
    pub answer_text: Option<String>,
    pub hint_used: bool,
    pub assigned_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub marked_at: Option<DateTime<Utc>>,
    pub marked_by: Option<UserId>,
}

/// A signed adjustment to a team's clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLog {
    pub id: TimeLogId,
    pub team_id: TeamId,
    pub seconds: i64,
    pub reason: TimeLogReason,
    pub note: Option<String>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}
