//! Error and warning types.
//!
//! Only construction can fail with an `Err`. Everything that goes wrong while a
//! board is being played degrades to an `EngineWarning` and the engine carries on.

use crate::piece::{PieceId, Position};
use thiserror::Error;

/// Invalid construction-time configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value} for `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        value: usize,
        reason: &'static str,
    },
    #[error("grid is {actual_width}x{actual_height} but the configuration expects {width}x{height}")]
    GridMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
    #[error("grid holds piece type {found} but only {piece_types} types are configured")]
    UnknownPieceType { found: char, piece_types: usize },
}

/// Failure to parse a text grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("a grid needs at least one non-empty row")]
    Empty,
    #[error("row {line} has {found} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("unrecognized character '{symbol}' at line {line} col {column}")]
    UnknownSymbol {
        symbol: char,
        line: usize,
        column: usize,
    },
}

/// Why a swap request was turned down. Callers of `Engine::request_swap` only
/// ever see a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapRejection {
    #[error("a swap or cascade is already in flight")]
    Busy,
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
    #[error("positions {0} and {1} are not adjacent")]
    NotAdjacent(Position, Position),
    #[error("no piece at {0}")]
    EmptyCell(Position),
}

/// Non-fatal anomalies surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineWarning {
    #[error("could not avoid an instant match at {position} within the retry budget")]
    GenerationRetriesExhausted { position: Position },
    #[error("shuffle gave up after {attempts} attempts; kept the last layout")]
    ShuffleAttemptsExhausted { attempts: usize },
    #[error("piece {id} not found at {recorded} nor anywhere else on the board")]
    PieceNotFound { id: PieceId, recorded: Position },
    #[error("cascade stopped at the iteration ceiling ({iterations})")]
    CascadeCeilingReached { iterations: usize },
}
