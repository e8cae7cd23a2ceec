//! # Client Error Types
//!
//! Error types for configuration, remote calls and submission.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Http { status, body }  │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  InvalidResponse        │ │
//! │  │  ConfigLoad/Save│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Submission                                                     │   │
//! │  │  Rejected(CoreError)   validation failed, nothing was sent      │   │
//! │  │  AlreadySubmitting     a create call is still in flight         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use shopfloor_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering configuration, transport and submission.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Could not reach the API.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// The API answered with a non-success status.
    #[error("Server returned {status}: {body}")]
    Http { status: u16, body: String },

    /// The API answered with a body we could not understand.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // =========================================================================
    // Submission Errors
    // =========================================================================
    /// The cart did not pass local validation. Nothing was sent.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// Another submission of the same cart is still in flight.
    #[error("A submission is already in progress")]
    AlreadySubmitting,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the operator may simply try again.
    ///
    /// Nothing retries automatically; this only picks the wording of the
    /// failure notification.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::ConnectionFailed(_) | ClientError::Timeout => true,
            ClientError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Maps onto the shared failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Rejected(core) => core.kind(),
            ClientError::AlreadySubmitting => ErrorKind::InputRejected,
            _ => ErrorKind::SubmissionFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfloor_core::{ValidationFailures, ValidationIssue};

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::ConnectionFailed("refused".into()).is_retryable());
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::Http { status: 503, body: String::new() }.is_retryable());

        assert!(!ClientError::Http { status: 422, body: String::new() }.is_retryable());
        assert!(!ClientError::InvalidConfig("bad".into()).is_retryable());
        assert!(!ClientError::AlreadySubmitting.is_retryable());
    }

    #[test]
    fn test_kind_follows_core_error() {
        let failures = ValidationFailures::single(ValidationIssue::EmptyCart);
        let err = ClientError::from(CoreError::from(failures));
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.to_string(), "Cannot submit: The cart is empty");

        assert_eq!(ClientError::Timeout.kind(), ErrorKind::SubmissionFailed);
    }

    #[test]
    fn test_config_errors() {
        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
        assert!(!ClientError::Timeout.is_config_error());
    }
}
