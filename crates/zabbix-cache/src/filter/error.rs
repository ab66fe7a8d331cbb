//! Error types for filter parsing.

use thiserror::Error;

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while parsing a filter string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The text between the slashes is not a valid regular expression.
    #[error("invalid pattern {pattern}: {message}")]
    InvalidPattern {
        /// The filter as written by the user.
        pattern: String,
        /// Why the regex engine rejected it.
        message: String,
    },
}

impl FilterError {
    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        FilterError::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
