//! Common error types used throughout crossfader.

/// Common error type for crossfader.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A time value could not be represented (zero timescale, non-finite seconds).
    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

impl Error {
    /// Create a new InvalidTime error.
    pub fn invalid_time<S: Into<String>>(msg: S) -> Self {
        Self::InvalidTime(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
