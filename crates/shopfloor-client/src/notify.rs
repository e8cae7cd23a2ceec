//! # Notifications
//!
//! Operator-facing feedback. Core operations return typed results; the
//! caller turns them into a [`Notification`] and hands it to whatever sink
//! the front end provides.

use std::fmt;

use mockall::automock;
use serde::Serialize;
use shopfloor_core::ErrorKind;

use crate::submission::SubmissionOutcome;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    /// Severity used for a failure of the given kind.
    ///
    /// Local refusals are warnings; the operator can fix them on the spot.
    pub fn for_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InputRejected | ErrorKind::AdmissionDenied | ErrorKind::ValidationFailed => {
                Level::Warning
            }
            ErrorKind::SubmissionFailed => Level::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Success => write!(f, "success"),
            Level::Info => write!(f, "info"),
            Level::Warning => write!(f, "warning"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// One message for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(level: Level, title: impl Into<String>, message: impl Into<String>) -> Self {
        Notification {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Success, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Error, title, message)
    }

    /// Notification for a finished submission.
    ///
    /// `what` names the order type, e.g. "Sale" or "Work order".
    pub fn from_outcome(what: &str, outcome: &SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::Succeeded { id } => {
                Self::success(format!("{} created", what), format!("Reference {}", id))
            }
            SubmissionOutcome::Failed { reason, kind } => {
                Self::new(Level::for_kind(*kind), format!("{} not created", what), reason.clone())
            }
        }
    }
}

/// Where notifications go.
#[automock]
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OrderId;

    #[test]
    fn test_level_for_kind() {
        assert_eq!(Level::for_kind(ErrorKind::AdmissionDenied), Level::Warning);
        assert_eq!(Level::for_kind(ErrorKind::ValidationFailed), Level::Warning);
        assert_eq!(Level::for_kind(ErrorKind::SubmissionFailed), Level::Error);
    }

    #[test]
    fn test_from_outcome() {
        let ok = SubmissionOutcome::Succeeded { id: OrderId::new("S-10") };
        let n = Notification::from_outcome("Sale", &ok);
        assert_eq!(n.level, Level::Success);
        assert_eq!(n.title, "Sale created");
        assert_eq!(n.message, "Reference S-10");

        let failed = SubmissionOutcome::Failed {
            reason: "Request timed out".to_string(),
            kind: ErrorKind::SubmissionFailed,
        };
        let n = Notification::from_outcome("Work order", &failed);
        assert_eq!(n.level, Level::Error);
        assert_eq!(n.message, "Request timed out");
    }

    #[test]
    fn test_mock_sink_receives() {
        let mut sink = MockNotificationSink::new();
        sink.expect_notify()
            .once()
            .withf(|n| n.level == Level::Info && n.title == "Cart cleared")
            .return_const(());

        sink.notify(Notification::info("Cart cleared", ""));
    }
}
