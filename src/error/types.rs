/**
 * Relay Error Types
 *
 * Error taxonomy for the HTTP surface:
 *
 * - Authentication failure on the internal gateway (bad/missing secret)
 * - Malformed requests (missing required fields, unparseable bodies)
 * - Unknown fallback connections on the emit path
 *
 * Transport-level socket errors are deliberately NOT modeled here: they
 * are logged where they occur and never alter room state. A single bad
 * request must never affect other rooms or connections, so every variant
 * maps to a client-scoped HTTP response, not a process failure.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced by the relay's HTTP handlers.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Internal notify secret missing or mismatched.
    #[error("Forbidden")]
    Forbidden,

    /// A required field of the internal notify body is absent.
    #[error("Missing event or chatId")]
    MissingField,

    /// The fallback emit path named a connection the registry does not
    /// hold.
    #[error("Unknown connection")]
    UnknownConnection,

    /// A request that could not be understood (bad header, unparseable
    /// body).
    #[error("{message}")]
    BadRequest {
        /// Human-readable description of what was wrong
        message: String,
    },

    /// JSON serialization failure while building a response.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RelayError {
    /// Create a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::MissingField => StatusCode::BAD_REQUEST,
            Self::UnknownConnection => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message carried in the response body.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
