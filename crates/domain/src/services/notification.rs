//! In-platform purchase notification boundary.
//!
//! Provisioning records a notification after a successful capture; sends
//! are best-effort and never fail the request.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a new-purchase notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseNotification {
    pub user_id: Option<Uuid>,
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub total: Decimal,
    pub currency: String,
    pub item_names: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Result of a notification attempt.
#[derive(Debug, Clone)]
pub enum NotificationResult {
    /// Notification was recorded/sent.
    Recorded,
    /// Attempt failed (non-blocking).
    Failed(String),
}

/// Boundary for recording purchase notifications.
#[async_trait::async_trait]
pub trait PurchaseNotifier: Send + Sync {
    async fn notify_new_purchase(&self, payload: PurchaseNotification) -> NotificationResult;
}

/// Mock notifier for development and testing.
#[derive(Debug, Clone, Default)]
pub struct MockPurchaseNotifier {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockPurchaseNotifier {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl PurchaseNotifier for MockPurchaseNotifier {
    async fn notify_new_purchase(&self, payload: PurchaseNotification) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(
                invoice_number = %payload.invoice_number,
                "Mock notifier simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            invoice_number = %payload.invoice_number,
            total = %payload.total,
            items = payload.item_names.len(),
            "Mock: would record new-purchase notification"
        );

        NotificationResult::Recorded
    }
}
