//! Error types for study-core.

use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the scheduler and the session queue.
///
/// Every variant is a caller contract violation; nothing here is retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("quality {value} is outside the 0-5 scale")]
    QualityOutOfRange { value: i64 },

    #[error("{field} must not be negative, got {value}")]
    NegativeField { field: &'static str, value: f64 },

    #[error("{field} must be a whole number, got {value}")]
    FractionalField { field: &'static str, value: f64 },

    #[error("ease factor must be a finite number, got {value}")]
    NonFiniteEaseFactor { value: f64 },

    #[error("ease factor must be positive, got {value}")]
    NonPositiveEaseFactor { value: f64 },

    #[error("cannot {operation}: the session is complete")]
    SessionComplete { operation: &'static str },
}

impl Error {
    /// Malformed rating or prior scheduling fields.
    pub fn is_invalid_input(&self) -> bool {
        !self.is_invalid_state()
    }

    /// Operation attempted with no current card.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::SessionComplete { .. })
    }
}
