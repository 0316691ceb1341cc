//! Error types for the Othello crate

use thiserror::Error;

use crate::board::{Move, Side};

/// Main error type for the Othello crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("coordinate ({row}, {col}) is out of range (must be 0-7)")]
    OutOfRange { row: usize, col: usize },

    #[error("malformed coordinate '{input}' (expected e.g. '3d' or 'd3')")]
    MalformedCoordinate { input: String },

    #[error("board string has wrong length: expected {expected} cells, got {got}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid character '{character}' at cell {position} in board string")]
    InvalidCellCharacter { character: char, position: usize },

    #[error("legal move {mv} for {side} was rejected by placement")]
    LegalMoveFailed { mv: Move, side: Side },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
