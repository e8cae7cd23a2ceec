//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Operator                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  > add p-17 5                                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Remote Error? ─── ClientError::Timeout ───────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Cart Error? ─── CoreError::AdmissionDenied ──── ApiError ─────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  [INSUFFICIENT_STOCK] Insufficient stock for Brake pads: available 3,  │
//! │  requested 5                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! Errors serialize with a machine-readable `code`, a human-readable
//! `message` and, for failed submissions, every validation issue.

use serde::Serialize;
use shopfloor_client::{ClientError, Level, Notification};
use shopfloor_core::{CoreError, ValidationError, ValidationIssue};

/// API error returned from console commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_FAILED",
///   "message": "Cannot submit: The cart is empty",
///   "issues": [{ "code": "EMPTY_CART", "message": "The cart is empty" }]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Individual validation problems, empty unless `code` is `ValidationFailed`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<IssueDto>,
}

/// One validation issue as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDto {
    pub code: String,
    pub message: String,
}

impl From<&ValidationIssue> for IssueDto {
    fn from(issue: &ValidationIssue) -> Self {
        IssueDto {
            code: issue.code().to_string(),
            message: issue.to_string(),
        }
    }
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (product, cart line, search selection)
    NotFound,

    /// Input failed a basic check (quantity, amount, search term)
    ValidationError,

    /// Requested quantity exceeds available stock
    InsufficientStock,

    /// Cart or work order is not ready to submit
    ValidationFailed,

    /// A submission of the same cart is still in flight
    AlreadySubmitting,

    /// The remote API could not be reached or refused the order
    RemoteError,

    /// Configuration is missing or invalid
    ConfigError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            issues: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// The notification the operator sees for this error.
    ///
    /// Local refusals are warnings; remote and configuration problems are
    /// errors.
    pub fn to_notification(&self) -> Notification {
        let level = match self.code {
            ErrorCode::RemoteError | ErrorCode::ConfigError => Level::Error,
            _ => Level::Warning,
        };
        Notification::new(level, self.code.title(), self.message.clone())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InputRejected(_) => ErrorCode::ValidationError,
            CoreError::AdmissionDenied { .. } => ErrorCode::InsufficientStock,
            CoreError::ItemNotFound(_) => ErrorCode::NotFound,
            CoreError::ValidationFailed(_) => ErrorCode::ValidationFailed,
        };

        let issues = match &err {
            CoreError::ValidationFailed(failures) => failures.issues().iter().map(IssueDto::from).collect(),
            _ => Vec::new(),
        };

        ApiError {
            code,
            message: err.to_string(),
            issues,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rejected(core) => core.into(),
            ClientError::AlreadySubmitting => ApiError::new(ErrorCode::AlreadySubmitting, err.to_string()),
            e if e.is_config_error() => ApiError::new(ErrorCode::ConfigError, e.to_string()),
            e => ApiError::new(ErrorCode::RemoteError, e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::AlreadySubmitting => "ALREADY_SUBMITTING",
            ErrorCode::RemoteError => "REMOTE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        };
        f.write_str(code)
    }
}

impl ErrorCode {
    /// Short heading for notifications.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "Not found",
            ErrorCode::ValidationError => "Invalid input",
            ErrorCode::InsufficientStock => "Insufficient stock",
            ErrorCode::ValidationFailed => "Not ready to submit",
            ErrorCode::AlreadySubmitting => "Submission in progress",
            ErrorCode::RemoteError => "Back office unavailable",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl std::error::Error for ApiError {}
