//! Error types for every fallible boundary of the engine.
//!
//! None of these are fatal: each is a recoverable value handed back to the
//! caller, which decides how to report it.

use thiserror::Error;

use crate::board::Color;

/// Why a placement was rejected by the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Point is not empty
    #[error("illegal move: point not empty")]
    Occupied,
    /// Move would leave its own group without liberties and captures nothing
    #[error("illegal move: suicide")]
    Suicide,
    /// The game has already ended
    #[error("illegal move: game is over")]
    GameOver,
    /// Point lies outside the board
    #[error("illegal move: point is off the board")]
    OffBoard,
}

/// A coordinate that could not be parsed or does not fit the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("malformed coordinate: {0:?}")]
    Malformed(String),
    #[error("coordinate {coord:?} is outside a {size}x{size} board")]
    OutOfBounds { coord: String, size: usize },
}

/// Failure of a game session transition. The session is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Illegal(#[from] MoveError),
    #[error(transparent)]
    Coord(#[from] CoordError),
    #[error("action not available during board setup")]
    SetupPhase,
    #[error("unsupported board size {0}")]
    InvalidSize(usize),
}

/// A game record that cannot be turned into a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("unsupported board size {0}")]
    InvalidSize(usize),
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error(transparent)]
    Coord(#[from] CoordError),
    #[error("ply {ply}: {color} played out of turn")]
    OutOfTurn { ply: usize, color: Color },
    #[error("ply {ply}: {source}")]
    IllegalMove {
        ply: usize,
        #[source]
        source: MoveError,
    },
    #[error("setup stone at ({x}, {y}) is off the board")]
    SetupOffBoard { x: usize, y: usize },
}
