//! Error types for annotation file encoding and decoding.

use thiserror::Error;

/// Errors that can occur while reading, writing, or decoding annotation files.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error (includes missing or mistyped fields)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Delimited file does not hold exactly one x/y pair per landmark
    #[error("expected {expected} coordinate values (68 points x 2), found {actual}")]
    TokenCount {
        /// Required number of tokens
        expected: usize,
        /// Number of tokens found in the file
        actual: usize,
    },

    /// A token could not be read as a finite number
    #[error("Invalid coordinate value '{token}'")]
    InvalidNumber {
        /// The offending token
        token: String,
    },

    /// Structured record references an id outside 1..=68
    #[error("Invalid keypoint id {id}: expected 1..=68")]
    InvalidKeypointId {
        /// The id found in the record
        id: i64,
    },
}

impl FormatError {
    /// Create an invalid number error.
    pub fn invalid_number(token: impl Into<String>) -> Self {
        Self::InvalidNumber {
            token: token.into(),
        }
    }
}
