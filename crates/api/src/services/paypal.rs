//! PayPal payment gateway client.
//!
//! Implements the capture flow against the PayPal Orders v2 API: fetch an
//! OAuth token with the configured credentials, then capture the approved
//! order. Gateway rejections (order not approved, already captured) map to
//! `PaymentError::Rejected`; transport and 5xx failures map to
//! `PaymentError::Unavailable`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

use domain::services::{CaptureOutcome, CaptureStatus, PaymentError, PaymentGateway};

use crate::config::PaymentsConfig;

/// PayPal Orders v2 client.
pub struct PayPalGateway {
    client: Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl PayPalGateway {
    /// Create a new gateway from payments configuration.
    pub fn new(config: &PaymentsConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.paypal_base_url.trim_end_matches('/').to_string(),
            client_id: config.paypal_client_id.clone(),
            secret: config.paypal_secret.clone(),
        }
    }

    /// Fetch an OAuth access token with the client credentials grant.
    async fn access_token(&self) -> Result<String, PaymentError> {
        let url = format!("{}/v1/oauth2/token", self.base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PaymentError::Unavailable(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "PayPal token request rejected");
            return Err(PaymentError::Unavailable(format!(
                "Token request returned {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PaymentError::Unavailable(format!("Invalid token response: {}", e)))?;

        body.get("access_token")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                PaymentError::Unavailable("Token response missing access_token".to_string())
            })
    }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome, PaymentError> {
        let token = self.access_token().await?;

        let url = format!("{}/v2/checkout/orders/{}/capture", self.base_url, order_id);
        debug!(order_id = %order_id, "Capturing PayPal order");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .body("{}")
            .send()
            .await
            .map_err(|e| PaymentError::Unavailable(format!("Capture request failed: {}", e)))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_client_error() {
            let reason = rejection_reason(&body);
            warn!(order_id = %order_id, status = %status, reason = %reason, "PayPal rejected capture");
            return Err(PaymentError::Rejected(reason));
        }

        if !status.is_success() {
            error!(order_id = %order_id, status = %status, "PayPal capture failed");
            return Err(PaymentError::Unavailable(format!(
                "Capture returned {}",
                status
            )));
        }

        Ok(outcome_from_capture_body(order_id, &body))
    }

    fn provider_name(&self) -> &'static str {
        "paypal"
    }
}

/// Extract the rejection reason from a PayPal error body.
///
/// PayPal 4xx bodies carry `details[0].issue` (e.g. `ORDER_NOT_APPROVED`);
/// fall back to the top-level message.
fn rejection_reason(body: &Value) -> String {
    body.get("details")
        .and_then(|d| d.get(0))
        .and_then(|d| d.get("issue"))
        .and_then(|v| v.as_str())
        .or_else(|| body.get("message").and_then(|v| v.as_str()))
        .unwrap_or("Capture was rejected")
        .to_string()
}

/// Build a capture outcome from a successful capture response body.
///
/// The capture id lives at `purchase_units[0].payments.captures[0].id`;
/// when PayPal omits it the order id stands in so the receipt still has a
/// reference.
fn outcome_from_capture_body(order_id: &str, body: &Value) -> CaptureOutcome {
    let status = match body.get("status").and_then(|v| v.as_str()) {
        Some("COMPLETED") => CaptureStatus::Completed,
        Some("PENDING") => CaptureStatus::Pending,
        Some("DECLINED") => CaptureStatus::Declined,
        _ => CaptureStatus::Failed,
    };

    let capture_id = body
        .get("purchase_units")
        .and_then(|u| u.get(0))
        .and_then(|u| u.get("payments"))
        .and_then(|p| p.get("captures"))
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("id"))
        .and_then(|v| v.as_str())
        .unwrap_or(order_id)
        .to_string();

    let payer_email = body
        .get("payer")
        .and_then(|p| p.get("email_address"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    CaptureOutcome {
        status,
        capture_id,
        payer_email,
    }
}
