//! Enumerations shared by every layer of the game.
//!
//! Each enum round-trips through a lowercase text form. The same form is
//! used in JSON bodies and in SQLite TEXT columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($what:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),*
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// The stored text form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)*
                    other => Err(CoreError::UnknownVariant {
                        what: $what,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum! {
    /// Account role. Each role has its own dashboard.
    Role ("role") {
        Participant => "participant",
        Admin => "admin",
        SuperAdmin => "superadmin",
    }
}

impl Role {
    /// Whether this role may act as a room admin. Superadmins can.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

text_enum! {
    /// Question category. Drawn by weight when assigning.
    QuestionKind ("question kind") {
        Trivia => "trivia",
        Riddle => "riddle",
        Coding => "coding",
        Physical => "physical",
    }
}

text_enum! {
    /// Snake or ladder.
    RuleKind ("rule kind") {
        Snake => "snake",
        Ladder => "ladder",
    }
}

text_enum! {
    /// Lifecycle of a checkpoint created by a roll.
    CheckpointStatus ("checkpoint status") {
        /// Team is on its way to the room.
        Pending => "pending",
        /// Room admin confirmed arrival and a question was assigned.
        Approved => "approved",
        /// Answer was marked; the team may roll again.
        Completed => "completed",
    }
}

impl CheckpointStatus {
    pub fn is_open(&self) -> bool {
        !matches!(self, CheckpointStatus::Completed)
    }
}

text_enum! {
    /// Lifecycle of a question assignment.
    AssignmentStatus ("assignment status") {
        Assigned => "assigned",
        Submitted => "submitted",
        Correct => "correct",
        Incorrect => "incorrect",
    }
}

impl AssignmentStatus {
    /// Whether an admin has not yet marked this assignment.
    pub fn is_unmarked(&self) -> bool {
        matches!(self, AssignmentStatus::Assigned | AssignmentStatus::Submitted)
    }
}

text_enum! {
    /// Why a team's clock was adjusted.
    TimeLogReason ("time log reason") {
        HintPenalty => "hint_penalty",
        WrongAnswer => "wrong_answer",
        AdminAdjustment => "admin_adjustment",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_round_trips() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
        for kind in QuestionKind::ALL {
            assert_eq!(kind.as_str().parse::<QuestionKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn serde_uses_text_form() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"superadmin\""
        );
        assert_eq!(
            serde_json::to_string(&TimeLogReason::WrongAnswer).unwrap(),
            "\"wrong_answer\""
        );
    }

    #[test]
    fn unknown_text_is_an_error() {
        let err = "wizard".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("wizard"));
    }

    #[test]
    fn superadmin_counts_as_admin() {
        assert!(Role::SuperAdmin.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Participant.is_admin());
    }

    #[test]
    fn open_and_unmarked_states() {
        assert!(CheckpointStatus::Pending.is_open());
        assert!(CheckpointStatus::Approved.is_open());
        assert!(!CheckpointStatus::Completed.is_open());
        assert!(AssignmentStatus::Submitted.is_unmarked());
        assert!(!AssignmentStatus::Correct.is_unmarked());
    }
}
