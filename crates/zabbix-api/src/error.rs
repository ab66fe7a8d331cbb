//! Error types for the Zabbix API client.

use std::fmt;

/// Errors reported by the Zabbix server or the HTTP layer in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP-level error with status code.
    Http { status: u16, message: String },
    /// Authentication failure (bad credentials or rejected HTTP auth).
    Auth { message: String },
    /// JSON-RPC error object returned by the API.
    Rpc {
        code: i64,
        message: String,
        data: String,
    },
    /// Network/connection error.
    Network { message: String },
    /// The response was valid JSON but not a JSON-RPC envelope we understand.
    InvalidResponse { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, message } => write!(f, "HTTP error {}: {}", status, message),
            ApiError::Auth { message } => write!(f, "Auth error: {}", message),
            ApiError::Rpc {
                code,
                message,
                data,
            } => {
                if data.is_empty() {
                    write!(f, "Zabbix API error {}: {}", code, message)
                } else {
                    write!(f, "Zabbix API error {}: {} {}", code, message, data)
                }
            }
            ApiError::Network { message } => write!(f, "Network error: {}", message),
            ApiError::InvalidResponse { message } => {
                write!(f, "Invalid API response: {}", message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns true if the server rejected the request because the session
    /// token is no longer valid. A fresh `user.login` usually fixes this.
    pub fn is_session_expired(&self) -> bool {
        let ApiError::Rpc { message, data, .. } = self else {
            return false;
        };
        let text = format!("{} {}", message, data).to_lowercase();
        text.contains("session terminated")
            || text.contains("re-login")
            || text.contains("not authorised")
            || text.contains("not authorized")
    }

    /// Returns true if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::Network { .. } => 3,
            _ => 2,
        }
    }
}

/// Top-level error type for the client library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error reported by the API or the HTTP layer.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Error raised by the HTTP client itself (request building, body decoding).
    #[error("HTTP client error: {0}")]
    Http(reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Error::Api(ApiError::Network {
                message: err.to_string(),
            })
        } else {
            Error::Http(err)
        }
    }
}

impl Error {
    /// Returns the wrapped API error, if any.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Api(e) => e.exit_code(),
            _ => 2,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
