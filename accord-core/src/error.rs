//! Error types for accord-core.

use thiserror::Error;

/// Result type for accord-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for accord-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A segment whose end precedes its begin.
    #[error("Invalid segment \"{label}\": end {end} precedes begin {begin}")]
    InvalidSegment {
        /// Segment label.
        label: String,
        /// Begin time in milliseconds.
        begin: u64,
        /// End time in milliseconds.
        end: u64,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
