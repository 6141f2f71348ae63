//! Errors reported by the library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid move notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("empty move")]
    Empty,
    #[error("unknown face `{0}` (expected one of R, U, F, L, D, B)")]
    UnknownFace(char),
    #[error("unknown turn suffix `{0}` in `{1}` (expected nothing, `2` or `'`)")]
    UnknownSuffix(String, String),
}

/// Cube state that violates the permutation or orientation invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    #[error("{orbit} {array} has {found} entries, expected {expected}")]
    WrongLength { orbit: &'static str, array: &'static str, expected: usize, found: usize },
    #[error("{orbit} positions are not a permutation: slot {slot} is out of range or repeated")]
    NotAPermutation { orbit: &'static str, slot: u8 },
    #[error("{orbit} piece {piece} has orientation {orientation}, expected less than {limit}")]
    OrientationOutOfRange { orbit: &'static str, piece: usize, orientation: u8, limit: u8 },
    #[error("expected 4 lines (corner positions, corner orientations, edge positions, edge orientations), found {0}")]
    WrongLineCount(usize),
    #[error("`{0}` is not a valid number")]
    NotANumber(String),
}

/// Invalid choice of pieces for a pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern must track at least one piece")]
    Empty,
    #[error("pattern tracks {tracked} pieces, but the orbit has only {available}")]
    TooManyPieces { tracked: usize, available: usize },
    #[error("piece {0} is out of range for the orbit")]
    PieceOutOfRange(u8),
    #[error("piece {0} is tracked more than once")]
    DuplicatedPiece(u8),
}

/// Failure to load or store a pattern database.
#[derive(Error, Debug)]
pub enum PatternDbError {
    #[error("cannot access pattern database file {path}: {source}")]
    Io { path: PathBuf, #[source] source: io::Error },
    #[error("pattern database I/O failed: {0}")]
    Stream(#[from] io::Error),
    #[error("pattern database has {found} entries, but its pattern needs {expected}")]
    SizeMismatch { expected: usize, found: usize },
}

/// Failure of pattern database generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{0} entries were not reached by the breadth-first search")]
    Unexplored(usize),
    #[error("distance {0} collides with the value reserved for unexplored entries")]
    DepthOverflow(u8),
}

/// Failure of the solver.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    #[error("no solution within {max_depth} moves (next bound would be {bound}); the state or the heuristic is invalid")]
    BoundExceeded { bound: u8, max_depth: u8 },
    #[error("search was cancelled")]
    Cancelled,
}
