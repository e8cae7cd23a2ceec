//! # Error Types
//!
//! Domain-specific error types for shopfloor-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopfloor-core errors (this file)                                      │
//! │  ├── CoreError          - Cart operation outcomes                       │
//! │  │   ├── InputRejected     (negative amount, bad quantity)             │
//! │  │   ├── AdmissionDenied   (stock policy)                               │
//! │  │   ├── ItemNotFound      (unknown line id)                            │
//! │  │   └── ValidationFailed  (every missing precondition at once)        │
//! │  ├── ValidationError    - Single input check failures                   │
//! │  └── ValidationIssue    - One submission precondition failure           │
//! │                                                                         │
//! │  shopfloor-client errors (separate crate)                               │
//! │  └── ClientError        - SubmissionFailed: transport / server          │
//! │                                                                         │
//! │  Console errors (in app)                                                │
//! │  └── ApiError           - What the operator sees (serialized)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error here is detected locally, before any remote call, and leaves
//! the cart exactly as it was.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse failure category used by callers to pick a notification style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Negative amount or non-positive quantity. Mutation was a no-op.
    InputRejected,
    /// Stock policy refused the quantity. Mutation was a no-op.
    AdmissionDenied,
    /// One or more submission preconditions are missing.
    ValidationFailed,
    /// Transport or server error during the create call.
    SubmissionFailed,
}

// =============================================================================
// Core Error
// =============================================================================

/// Cart and work order operation errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input did not pass a basic check.
    #[error("Input rejected: {0}")]
    InputRejected(#[from] ValidationError),

    /// Requested quantity is not admissible against available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// AdmissionDenied { name: "Brake pads", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Brake pads in stock"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    AdmissionDenied {
        product_id: String,
        name: String,
        available: i64,
        requested: i64,
    },

    /// No line with this id exists in the cart.
    #[error("Item not found in cart: {0}")]
    ItemNotFound(String),

    /// Submission preconditions failed.
    #[error("{0}")]
    ValidationFailed(ValidationFailures),
}

impl CoreError {
    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InputRejected(_) | CoreError::ItemNotFound(_) => ErrorKind::InputRejected,
            CoreError::AdmissionDenied { .. } => ErrorKind::AdmissionDenied,
            CoreError::ValidationFailed(_) => ErrorKind::ValidationFailed,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by setters and quantity changes before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Amount beyond what a cart can hold.
    #[error("{field} exceeds the largest amount a cart can hold")]
    TooLarge { field: String },

    /// Invalid format (e.g. unparseable amount or date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Submission Validation
// =============================================================================

/// One unmet submission precondition.
///
/// The retail cart reports the first three kinds, the work order the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("The cart is empty")]
    EmptyCart,

    #[error("Select a customer before completing the sale")]
    MissingCustomer,

    #[error("Only {available} of {name} in stock, cart has {requested}")]
    InsufficientStock {
        product_id: String,
        name: String,
        available: i64,
        requested: i64,
    },

    #[error("Select a vehicle")]
    MissingVehicle,

    #[error("Select a technician")]
    MissingTechnician,

    #[error("Intake date is required")]
    MissingIntakeDate,

    #[error("Odometer reading is required")]
    MissingOdometer,

    #[error("Describe the problem reported by the customer")]
    MissingProblemDescription,

    #[error("Add at least one service or part")]
    EmptyOrder,
}

impl ValidationIssue {
    /// Stable machine-readable code for the issue.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationIssue::EmptyCart => "EMPTY_CART",
            ValidationIssue::MissingCustomer => "MISSING_CUSTOMER",
            ValidationIssue::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            ValidationIssue::MissingVehicle => "MISSING_VEHICLE",
            ValidationIssue::MissingTechnician => "MISSING_TECHNICIAN",
            ValidationIssue::MissingIntakeDate => "MISSING_INTAKE_DATE",
            ValidationIssue::MissingOdometer => "MISSING_ODOMETER",
            ValidationIssue::MissingProblemDescription => "MISSING_PROBLEM_DESCRIPTION",
            ValidationIssue::EmptyOrder => "EMPTY_ORDER",
        }
    }
}

/// Every issue found by a `validate_for_submission` pass.
///
/// Never empty: an empty pass is `Ok(())`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailures(Vec<ValidationIssue>);

impl ValidationFailures {
    /// Turns a collected issue list into a result.
    pub fn check(issues: Vec<ValidationIssue>) -> Result<(), ValidationFailures> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailures(issues))
        }
    }

    pub fn single(issue: ValidationIssue) -> Self {
        ValidationFailures(vec![issue])
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    pub fn contains(&self, issue: &ValidationIssue) -> bool {
        self.0.contains(issue)
    }
}

impl fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot submit: ")?;
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailures {}

impl From<ValidationFailures> for CoreError {
    fn from(failures: ValidationFailures) -> Self {
        CoreError::ValidationFailed(failures)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
