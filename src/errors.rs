//! Error types surfaced by the engine core.
//!
//! Malformed external input (position descriptions, move text) is reported as a
//! failure result and never repaired. Search control flow never uses errors:
//! cancellation and "no legal move" are normal outcomes carried by reports.

use thiserror::Error;

use crate::game_state::chess_types::Color;
use crate::move_generation::move_generator::MoveGenerationError;

/// A six-field position description could not be turned into a position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("expected 6 position fields, got {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),

    #[error("invalid side-to-move field: {0}")]
    InvalidSideToMove(String),

    #[error("invalid castling rights character: {0}")]
    InvalidCastling(char),

    #[error("invalid en-passant target: {0}")]
    InvalidEnPassant(String),

    #[error("invalid {field} clock: {value}")]
    InvalidClock { field: &'static str, value: String },

    #[error("{color:?} must have exactly one king, found {count}")]
    KingCount { color: Color, count: u32 },

    #[error("invalid square: {0}")]
    InvalidSquare(String),
}

pub type PositionResult<T> = Result<T, PositionError>;

/// Move text could not be resolved to a legal move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("malformed long algebraic move: {0}")]
    Malformed(String),

    #[error("invalid promotion piece character: {0}")]
    InvalidPromotion(char),

    #[error("move {0} is not legal in this position")]
    NotLegal(String),

    #[error(transparent)]
    Square(#[from] PositionError),

    #[error(transparent)]
    Generation(#[from] MoveGenerationError),
}

pub type MoveParseResult<T> = Result<T, MoveParseError>;

/// The background search engine refused a request or lost its worker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("a search is already running; stop it before starting another")]
    AlreadySearching,

    #[error("the best-move cache is in use by a running search")]
    SearchInProgress,

    #[error("search worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    MoveGeneration(#[from] MoveGenerationError),
}

pub type EngineResult<T> = Result<T, EngineError>;
