//! Purchase entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::purchase::{Purchase, PurchaseStatus};
use domain::models::schedule::WeeklySlot;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the purchases table.
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseEntity {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub status: String,
    pub selected_schedule: Option<serde_json::Value>,
    pub prorated_classes: Option<i32>,
    pub prorated_price: Option<Decimal>,
    pub enrollment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<PurchaseEntity> for Purchase {
    fn from(entity: PurchaseEntity) -> Self {
        let selected_schedule = entity
            .selected_schedule
            .and_then(|value| serde_json::from_value::<Vec<WeeklySlot>>(value).ok());
        Purchase {
            id: entity.id,
            invoice_id: entity.invoice_id,
            product_id: entity.product_id,
            plan_id: entity.plan_id,
            name: entity.name,
            unit_price: entity.unit_price,
            quantity: entity.quantity,
            status: entity.status.parse().unwrap_or(PurchaseStatus::Confirmed),
            selected_schedule,
            prorated_classes: entity.prorated_classes,
            prorated_price: entity.prorated_price,
            enrollment_id: entity.enrollment_id,
            created_at: entity.created_at,
        }
    }
}
