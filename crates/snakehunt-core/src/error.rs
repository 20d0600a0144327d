//! Core error types for snakehunt-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the pure game rules.

use thiserror::Error;

use crate::types::RuleKind;

/// Core errors produced by the snakehunt-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A rule tile lies outside the playable range.
    #[error("tile {tile} is outside the rule range 2..=149")]
    TileOutOfRange { tile: u32 },

    /// A snake that climbs or a ladder that descends.
    #[error("{kind} from {start} to {end} goes the wrong way")]
    WrongDirection { kind: RuleKind, start: u32, end: u32 },

    /// Two rules start on the same tile.
    #[error("tile {tile} already starts another rule")]
    DuplicateStart { tile: u32 },

    /// A rule ends on the start tile of another rule.
    #[error("rule ending on tile {tile} would chain into another rule")]
    ChainedRule { tile: u32 },

    /// A position outside the board was supplied.
    #[error("position {position} is not on the board")]
    InvalidPosition { position: u32 },

    /// An enum value stored as text could not be parsed.
    #[error("unknown {what}: '{value}'")]
    UnknownVariant { what: &'static str, value: String },

    /// A question weight specification was malformed.
    #[error("invalid question weights: {reason}")]
    InvalidWeights { reason: String },
}
