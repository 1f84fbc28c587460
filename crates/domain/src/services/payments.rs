//! Payment gateway abstraction.
//!
//! The capture endpoint talks to the gateway through this trait; the real
//! PayPal client lives in the API crate, the mock here backs tests and the
//! `mock` provider config.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Status of a gateway capture attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureStatus {
    Completed,
    Pending,
    Declined,
    Failed,
}

impl CaptureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureStatus::Completed => "COMPLETED",
            CaptureStatus::Pending => "PENDING",
            CaptureStatus::Declined => "DECLINED",
            CaptureStatus::Failed => "FAILED",
        }
    }

    /// Only completed captures are provisioned.
    pub fn is_completed(&self) -> bool {
        matches!(self, CaptureStatus::Completed)
    }
}

impl fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a successful gateway call (the capture itself may still have
/// been declined; check `status`).
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub status: CaptureStatus,
    pub capture_id: String,
    pub payer_email: Option<String>,
}

/// Gateway-level failures: the call never produced a capture result.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment gateway unreachable: {0}")]
    Unavailable(String),

    #[error("Payment gateway rejected the request: {0}")]
    Rejected(String),
}

/// Payment gateway boundary.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Capture a previously approved order.
    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome, PaymentError>;

    /// Provider label surfaced in health output and logs.
    fn provider_name(&self) -> &'static str;
}

/// Mock gateway for development and testing.
#[derive(Debug, Clone)]
pub struct MockGateway {
    status: CaptureStatus,
    unreachable: bool,
    payer_email: Option<String>,
}

impl MockGateway {
    /// Gateway that completes every capture.
    pub fn completing() -> Self {
        Self {
            status: CaptureStatus::Completed,
            unreachable: false,
            payer_email: Some("payer@example.com".to_string()),
        }
    }

    /// Gateway that declines every capture.
    pub fn declining() -> Self {
        Self {
            status: CaptureStatus::Declined,
            unreachable: false,
            payer_email: None,
        }
    }

    /// Gateway whose calls always fail at the transport level.
    pub fn unreachable() -> Self {
        Self {
            status: CaptureStatus::Failed,
            unreachable: true,
            payer_email: None,
        }
    }

    pub fn with_payer_email(mut self, email: impl Into<String>) -> Self {
        self.payer_email = Some(email.into());
        self
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::completing()
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome, PaymentError> {
        if self.unreachable {
            tracing::warn!(order_id = %order_id, "Mock gateway simulating outage");
            return Err(PaymentError::Unavailable("Simulated outage".to_string()));
        }

        tracing::info!(
            order_id = %order_id,
            status = %self.status,
            "Mock gateway capture"
        );

        Ok(CaptureOutcome {
            status: self.status,
            capture_id: format!("MOCK-CAP-{}", order_id),
            payer_email: self.payer_email.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_status_strings() {
        assert_eq!(CaptureStatus::Completed.as_str(), "COMPLETED");
        assert_eq!(CaptureStatus::Declined.as_str(), "DECLINED");
        assert!(CaptureStatus::Completed.is_completed());
        assert!(!CaptureStatus::Pending.is_completed());
    }

    #[tokio::test]
    async fn test_mock_gateway_completes() {
        let gateway = MockGateway::completing();
        let outcome = gateway.capture_order("ORDER-1").await.unwrap();
        assert_eq!(outcome.status, CaptureStatus::Completed);
        assert_eq!(outcome.capture_id, "MOCK-CAP-ORDER-1");
        assert!(outcome.payer_email.is_some());
    }

    #[tokio::test]
    async fn test_mock_gateway_declines() {
        let gateway = MockGateway::declining();
        let outcome = gateway.capture_order("ORDER-2").await.unwrap();
        assert_eq!(outcome.status, CaptureStatus::Declined);
        assert!(!outcome.status.is_completed());
    }

    #[tokio::test]
    async fn test_mock_gateway_outage() {
        let gateway = MockGateway::unreachable();
        let err = gateway.capture_order("ORDER-3").await.unwrap_err();
        assert!(matches!(err, PaymentError::Unavailable(_)));
    }
}
