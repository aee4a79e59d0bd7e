//! Log-only notification sender for development.
//!
//! This module provides a delivery implementation that writes notifications
//! to the log instead of sending them. In production, this would be
//! replaced with an actual transactional-email integration implementing
//! [`NotificationSender`].

use slotwell_core::environment::{EnvFuture, Notification, NotificationSender, SendError};
use std::sync::Arc;

/// Notification sender that logs every message (always succeeds).
#[derive(Clone, Debug, Default)]
pub struct LogOnlyNotificationSender;

impl LogOnlyNotificationSender {
    /// Creates a new log-only sender.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped instance for sharing.
    #[must_use]
    pub fn shared() -> Arc<dyn NotificationSender> {
        Arc::new(Self::new())
    }
}

impl NotificationSender for LogOnlyNotificationSender {
    fn send(&self, notification: Notification) -> EnvFuture<'_, Result<(), SendError>> {
        Box::pin(async move {
            tracing::info!(
                to = %notification.to,
                subject = %notification.subject,
                template = %notification.template,
                "notification logged instead of delivered"
            );
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_only_sender_accepts_everything() {
        let sender = LogOnlyNotificationSender::new();
        let result = sender
            .send(Notification {
                to: "a@x.com".to_string(),
                subject: "Your session is booked".to_string(),
                template: "booking-confirmation-user".to_string(),
                data: serde_json::json!({}),
            })
            .await;

        assert!(result.is_ok());
    }
}
