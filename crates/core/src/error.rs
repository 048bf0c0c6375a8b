//! Validation error model.

use thiserror::Error;

/// Result type for boundary validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A value supplied at a boundary (wire payload, config, user input) was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty or whitespace only.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// An identifier was invalid.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A value was present but malformed.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
