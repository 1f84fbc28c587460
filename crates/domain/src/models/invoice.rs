//! Invoice domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Invoice status. Invoices are only written after a completed capture,
/// so PAID is the only state this workflow produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "PAID",
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PAID" => Ok(InvoiceStatus::Paid),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A paid invoice. Immutable after creation; amounts are recorded exactly
/// as the storefront submitted them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    /// Human-facing number, `INV-<year>-<8 hex>`.
    pub number: String,
    pub user_id: Uuid,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub status: InvoiceStatus,
    /// Gateway order id the capture was executed for.
    pub order_id: String,
    /// Gateway capture id returned by the capture call.
    pub capture_id: String,
    pub payer_email: Option<String>,
    pub coupon_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
