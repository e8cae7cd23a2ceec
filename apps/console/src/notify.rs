//! # Console Notifications
//!
//! Prints operator notifications to stdout and mirrors them into the log.

use std::io::Write;

use shopfloor_client::{Level, Notification, NotificationSink};
use tracing::{error, info, warn};

/// One-line rendering used on the terminal.
///
/// ```text
/// [success] Sale created: Reference S-501
/// [warning] Sale not created: Cannot submit: The cart is empty
/// ```
pub fn format_notification(notification: &Notification) -> String {
    if notification.message.is_empty() {
        format!("[{}] {}", notification.level, notification.title)
    } else {
        format!("[{}] {}: {}", notification.level, notification.title, notification.message)
    }
}

/// Notification sink for the terminal front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success | Level::Info => {
                info!(title = %notification.title, message = %notification.message, "Notification")
            }
            Level::Warning => warn!(title = %notification.title, message = %notification.message, "Notification"),
            Level::Error => error!(title = %notification.title, message = %notification.message, "Notification"),
        }

        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", format_notification(&notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_message() {
        let n = Notification::success("Sale created", "Reference S-501");
        assert_eq!(format_notification(&n), "[success] Sale created: Reference S-501");
    }

    #[test]
    fn test_format_without_message() {
        let n = Notification::info("Cart cleared", "");
        assert_eq!(format_notification(&n), "[info] Cart cleared");
    }
}
