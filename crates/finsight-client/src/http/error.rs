/*
[INPUT]:  Error sources (HTTP transport, API rejections, auth, malformed payloads)
[OUTPUT]: Structured error types with classification helpers
[POS]:    Error handling layer - unified error types for the client crate
[UPDATE]: When adding new error sources or changing classification rules
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the finsight client.
#[derive(Error, Debug)]
pub enum FinsightError {
    /// HTTP transport failed (connect, timeout, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The bearer credential was rejected or missing
    #[error("authentication rejected: {message}")]
    Unauthorized { message: String },

    /// Status value outside the closed task-status set
    #[error("malformed task status from server: {value:?}")]
    MalformedStatus { value: String },

    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl FinsightError {
    /// Errors the next scheduled poll may recover from.
    ///
    /// Malformed statuses count as transient: the server may report a clean
    /// status on the next fetch, and the polling cadence is the retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            FinsightError::Http(_) | FinsightError::MalformedStatus { .. } => true,
            FinsightError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Credential-level failure. Never retried locally; escalated to the
    /// host's process-wide handler.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, FinsightError::Unauthorized { .. })
    }

    /// Map a non-success response status to the right variant.
    pub fn from_response(status: StatusCode, message: impl Into<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            FinsightError::Unauthorized {
                message: message.into(),
            }
        } else {
            FinsightError::Api {
                status: status.as_u16(),
                message: message.into(),
            }
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, FinsightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_transient_classification() {
        let malformed = FinsightError::MalformedStatus {
            value: "RETRY".to_string(),
        };
        assert!(malformed.is_transient());
        assert!(!malformed.is_auth_error());

        let server_err = FinsightError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(server_err.is_transient());

        let client_err = FinsightError::Api {
            status: 400,
            message: "bad request".to_string(),
        };
        assert!(!client_err.is_transient());
    }

    #[test]
    fn test_error_auth_classification() {
        let auth = FinsightError::Unauthorized {
            message: "token expired".to_string(),
        };
        assert!(auth.is_auth_error());
        assert!(!auth.is_transient());
    }

    #[test]
    fn test_from_response_maps_401() {
        let err = FinsightError::from_response(StatusCode::UNAUTHORIZED, "no");
        assert!(matches!(err, FinsightError::Unauthorized { .. }));

        let err = FinsightError::from_response(StatusCode::BAD_REQUEST, "Only PDF files are allowed");
        match err {
            FinsightError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Only PDF files are allowed");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
