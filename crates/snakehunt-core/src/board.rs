//! Board arithmetic: dice, movement, snakes and ladders.
//!
//! [`Board`] is a validated rule set for one map. [`Board::plan_move`] is a
//! pure function from (position, dice) to a [`MoveOutcome`]; persisting the
//! outcome is the caller's job.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::BoardRule;
use crate::types::RuleKind;

/// Number of tiles. Reaching this tile finishes the game.
pub const BOARD_SIZE: u32 = 150;

/// Every team starts here.
pub const START_TILE: u32 = 1;

pub const DICE_FACES: u8 = 6;

/// Rolls one die.
pub fn roll_die<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=DICE_FACES)
}

/// Moves `dice` tiles forward. Overshooting the last tile clamps to it.
pub fn advance(position: u32, dice: u8) -> u32 {
    (position + dice as u32).min(BOARD_SIZE)
}

/// Checks that `position` is a tile of the board.
pub fn check_position(position: u32) -> Result<u32, CoreError> {
    if (START_TILE..=BOARD_SIZE).contains(&position) {
        Ok(position)
    } else {
        Err(CoreError::InvalidPosition { position })
    }
}

/// A snake or ladder reduced to what movement needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jump {
    pub kind: RuleKind,
    pub end: u32,
}

/// The result of one roll, before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub from: u32,
    pub dice: u8,
    /// Tile reached by counting pips.
    pub landed: u32,
    /// Tile after any snake or ladder.
    pub final_position: u32,
    pub rule: Option<RuleKind>,
    pub finished: bool,
}

impl MoveOutcome {
    pub fn hit_snake(&self) -> bool {
        self.rule == Some(RuleKind::Snake)
    }
}

/// A validated set of snakes and ladders keyed by start tile.
#[derive(Debug, Clone, Default)]
pub struct Board {
    jumps: HashMap<u32, Jump>,
}

impl Board {
    /// Builds a board, rejecting any rule set that breaks the tile rules.
    pub fn new<'a, I>(rules: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = &'a BoardRule>,
    {
        let mut board = Board::default();
        for rule in rules {
            board.insert(rule.kind, rule.start_tile, rule.end_tile)?;
        }
        board.check_chains()?;
        Ok(board)
    }

    /// Validates a single candidate rule against this board.
    pub fn check_candidate(&self, kind: RuleKind, start: u32, end: u32) -> Result<(), CoreError> {
        let mut trial = self.clone();
        trial.insert(kind, start, end)?;
        trial.check_chains()
    }

    fn insert(&mut self, kind: RuleKind, start: u32, end: u32) -> Result<(), CoreError> {
        for tile in [start, end] {
            if tile <= START_TILE || tile >= BOARD_SIZE {
                return Err(CoreError::TileOutOfRange { tile });
            }
        }
        let goes_right_way = match kind {
            RuleKind::Snake => end < start,
            RuleKind::Ladder => end > start,
        };
        if !goes_right_way {
            return Err(CoreError::WrongDirection { kind, start, end });
        }
        if self.jumps.contains_key(&start) {
            return Err(CoreError::DuplicateStart { tile: start });
        }
        self.jumps.insert(start, Jump { kind, end });
        Ok(())
    }

    fn check_chains(&self) -> Result<(), CoreError> {
        // Sorted so the reported tile is deterministic.
        let mut ends: Vec<u32> = self.jumps.values().map(|j| j.end).collect();
        ends.sort_unstable();
        match ends.into_iter().find(|end| self.jumps.contains_key(end)) {
            Some(tile) => Err(CoreError::ChainedRule { tile }),
            None => Ok(()),
        }
    }

    pub fn jump_at(&self, tile: u32) -> Option<Jump> {
        self.jumps.get(&tile).copied()
    }

    pub fn len(&self) -> usize {
        self.jumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jumps.is_empty()
    }

    /// Applies a roll from `from`. At most one rule is followed.
    pub fn plan_move(&self, from: u32, dice: u8) -> MoveOutcome {
        let landed = advance(from, dice);
        let (final_position, rule) = match self.jump_at(landed) {
            Some(jump) => (jump.end, Some(jump.kind)),
            None => (landed, None),
        };
        MoveOutcome {
            from,
            dice,
            landed,
            final_position,
            rule,
            finished: final_position == BOARD_SIZE,
        }
    }
}
