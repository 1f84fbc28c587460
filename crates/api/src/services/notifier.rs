//! Database-backed purchase notifier.
//!
//! Persists a `new_purchase` notification row so the student sees the
//! receipt inside the platform. Failures are logged and swallowed; the
//! capture response never depends on this write.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::services::{NotificationResult, PurchaseNotification, PurchaseNotifier};
use persistence::repositories::{NotificationInput, NotificationRepository};

/// Notifier that records purchase notifications in the platform inbox.
pub struct PlatformNotifier {
    repo: NotificationRepository,
}

impl PlatformNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: NotificationRepository::new(pool),
        }
    }
}

/// Builds the notification row for a purchase payload.
fn notification_input(payload: &PurchaseNotification) -> NotificationInput {
    NotificationInput {
        user_id: payload.user_id,
        kind: "new_purchase".to_string(),
        payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
    }
}

#[async_trait]
impl PurchaseNotifier for PlatformNotifier {
    async fn notify_new_purchase(&self, payload: PurchaseNotification) -> NotificationResult {
        let input = notification_input(&payload);

        match self.repo.create(input).await {
            Ok(_) => NotificationResult::Recorded,
            Err(e) => {
                tracing::warn!(
                    invoice_number = %payload.invoice_number,
                    error = %e,
                    "Failed to record purchase notification"
                );
                NotificationResult::Failed(e.to_string())
            }
        }
    }
}
