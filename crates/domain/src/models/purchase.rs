//! Purchase line item domain model and its status state machine.

use crate::models::schedule::WeeklySlot;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of a purchased line item.
///
/// `PENDING_CAPTURE → CONFIRMED → ENROLLED`, strictly forward. A purchase
/// stays CONFIRMED when its plan has no classes, no schedule was selected,
/// or no academic period resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    PendingCapture,
    Confirmed,
    Enrolled,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::PendingCapture => "PENDING_CAPTURE",
            PurchaseStatus::Confirmed => "CONFIRMED",
            PurchaseStatus::Enrolled => "ENROLLED",
        }
    }

    /// Whether the status machine allows moving to `next`.
    pub fn can_transition_to(&self, next: PurchaseStatus) -> bool {
        matches!(
            (self, next),
            (PurchaseStatus::PendingCapture, PurchaseStatus::Confirmed)
                | (PurchaseStatus::Confirmed, PurchaseStatus::Enrolled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PurchaseStatus::Confirmed | PurchaseStatus::Enrolled)
    }
}

impl FromStr for PurchaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING_CAPTURE" => Ok(PurchaseStatus::PendingCapture),
            "CONFIRMED" => Ok(PurchaseStatus::Confirmed),
            "ENROLLED" => Ok(PurchaseStatus::Enrolled),
            _ => Err(format!("Invalid purchase status: {}", s)),
        }
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One purchased line item on an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub status: PurchaseStatus,
    /// Snapshot of the weekly slots exactly as selected at checkout,
    /// teacher-local wall clock.
    pub selected_schedule: Option<Vec<WeeklySlot>>,
    pub prorated_classes: Option<i32>,
    pub prorated_price: Option<Decimal>,
    pub enrollment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    pub fn has_schedule(&self) -> bool {
        self.selected_schedule
            .as_ref()
            .map(|slots| !slots.is_empty())
            .unwrap_or(false)
    }
}

/// Late schedule selection for a purchase that was captured without one.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SelectScheduleRequest {
    #[validate(length(min = 1, message = "At least one weekly slot is required"))]
    #[validate(nested)]
    pub selected_schedule: Vec<WeeklySlot>,
}
