//! Error Types
//!
//! Failures raised while building or querying a vector store.

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GloveError>;

#[derive(Error, Debug)]
pub enum GloveError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: RecordFault },

    #[error("Unknown word: {0}")]
    UnknownWord(String),

    #[error("Row index {index} out of range (loaded rows: {loaded})")]
    IndexOutOfRange { index: usize, loaded: usize },

    #[error("Query vector has zero norm; cosine similarity is undefined")]
    ZeroVector,

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single record was rejected during load
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFault {
    /// Fewer than `dimension` components after the word
    MissingFields { expected: usize, actual: usize },
    /// More than `dimension` components after the word
    ExtraFields { expected: usize, actual: usize },
    /// A component is not a floating-point number
    InvalidNumber { column: usize, value: String },
    /// A component parsed to NaN or infinity
    NonFinite { column: usize },
    /// The word already owns a row
    DuplicateWord(String),
}

impl fmt::Display for RecordFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFault::MissingFields { expected, actual } => {
                write!(f, "expected {} components, found {}", expected, actual)
            }
            RecordFault::ExtraFields { expected, actual } => {
                write!(f, "expected {} components, found {}", expected, actual)
            }
            RecordFault::InvalidNumber { column, value } => {
                write!(f, "component {} is not a number: {:?}", column, value)
            }
            RecordFault::NonFinite { column } => write!(f, "component {} is not finite", column),
            RecordFault::DuplicateWord(word) => write!(f, "duplicate word {:?}", word),
        }
    }
}

impl GloveError {
    /// Whether the caller can reasonably continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GloveError::UnknownWord(_) | GloveError::ZeroVector | GloveError::DimensionMismatch { .. }
        )
    }
}
