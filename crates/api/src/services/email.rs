//! Email service for sending purchase notifications.
//!
//! Supports multiple email providers:
//! - `console`: Logs emails to console (development)
//! - `sendgrid`: Uses SendGrid API

use crate::config::EmailConfig;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Recipient name (optional)
    pub to_name: Option<String>,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Send a payment confirmation to the buyer.
    pub async fn send_payment_confirmation(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        invoice_number: &str,
        total: Decimal,
        currency: &str,
        item_names: &[String],
    ) -> Result<(), EmailError> {
        let subject = format!("Payment received - {}", invoice_number);

        let body_text = format!(
            r#"Hi{name},

Thank you for your purchase! We received your payment of {total} {currency}.

Invoice: {invoice_number}
Items:
{items}

You can start learning right away. If you still need to pick your weekly
class times, you can do that from your dashboard.

Happy learning,
The LingoClass Team"#,
            name = to_name.map(|n| format!(" {}", n)).unwrap_or_default(),
            total = total,
            currency = currency,
            invoice_number = invoice_number,
            items = bullet_list(item_names),
        );

        let message = EmailMessage {
            to: to_email.to_string(),
            to_name: to_name.map(|s| s.to_string()),
            subject,
            body_text,
        };

        self.send(message).await
    }

    /// Send a new-purchase alert to the configured admin address.
    pub async fn send_admin_purchase_alert(
        &self,
        invoice_number: &str,
        buyer_email: &str,
        total: Decimal,
        currency: &str,
        item_names: &[String],
    ) -> Result<(), EmailError> {
        let subject = format!("New purchase - {}", invoice_number);

        let body_text = format!(
            r#"A new purchase was completed.

Invoice: {invoice_number}
Buyer: {buyer_email}
Total: {total} {currency}
Items:
{items}"#,
            invoice_number = invoice_number,
            buyer_email = buyer_email,
            total = total,
            currency = currency,
            items = bullet_list(item_names),
        );

        let message = EmailMessage {
            to: self.config.admin_email.clone(),
            to_name: None,
            subject,
            body_text,
        };

        self.send(message).await
    }

    /// Console provider - logs email to console (for development).
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "📧 Email (console provider)"
        );

        info!(
            body_text = %message.body_text,
            "📧 Email body (plain text)"
        );

        Ok(())
    }

    /// SendGrid provider - sends via SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let client = reqwest::Client::new();

        let mut personalizations = serde_json::json!({
            "to": [{
                "email": message.to
            }]
        });

        if let Some(name) = &message.to_name {
            personalizations["to"][0]["name"] = serde_json::json!(name);
        }

        let body = serde_json::json!({
            "personalizations": [personalizations],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body_text
            }]
        });

        let response = client
            .post("https://api.sendgrid.com/v3/mail/send")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.sendgrid_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(
                to = %message.to,
                subject = %message.subject,
                "📧 Email sent via SendGrid"
            );
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "SendGrid API error"
            );
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

fn bullet_list(item_names: &[String]) -> String {
    item_names
        .iter()
        .map(|n| format!("  - {}", n))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            sendgrid_api_key: String::new(),
            sender_email: "noreply@lingoclass.app".to_string(),
            sender_name: "LingoClass".to_string(),
            admin_email: "admin@lingoclass.app".to_string(),
        }
    }

    #[test]
    fn test_email_service_creation() {
        let config = test_config();
        let service = EmailService::new(config);
        assert!(service.is_enabled());
    }

    #[test]
    fn test_email_service_disabled() {
        let mut config = test_config();
        config.enabled = false;
        let service = EmailService::new(config);
        assert!(!service.is_enabled());
    }

    #[tokio::test]
    async fn test_send_console_email() {
        let service = EmailService::new(test_config());

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            to_name: Some("Test User".to_string()),
            subject: "Test Subject".to_string(),
            body_text: "Test body".to_string(),
        };

        let result = service.send(message).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_disabled_silently_succeeds() {
        let mut config = test_config();
        config.enabled = false;
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            to_name: None,
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
        };

        let result = service.send(message).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_sendgrid_without_key_not_configured() {
        let mut config = test_config();
        config.provider = "sendgrid".to_string();
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            to_name: None,
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
        };

        let result = service.send(message).await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_unknown_provider_not_configured() {
        let mut config = test_config();
        config.provider = "pigeon".to_string();
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            to_name: None,
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
        };

        let result = service.send(message).await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_send_payment_confirmation() {
        let service = EmailService::new(test_config());

        let result = service
            .send_payment_confirmation(
                "buyer@example.com",
                Some("Ana"),
                "INV-2026-0a1b2c3d",
                Decimal::new(4900, 2),
                "USD",
                &["English B1".to_string()],
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_admin_purchase_alert() {
        let service = EmailService::new(test_config());

        let result = service
            .send_admin_purchase_alert(
                "INV-2026-0a1b2c3d",
                "buyer@example.com",
                Decimal::new(4900, 2),
                "USD",
                &["English B1".to_string(), "Study Pack".to_string()],
            )
            .await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_bullet_list_formatting() {
        let items = vec!["English B1".to_string(), "Study Pack".to_string()];
        let list = bullet_list(&items);
        assert_eq!(list, "  - English B1\n  - Study Pack");
    }
}
