//! Invoice entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::invoice::{Invoice, InvoiceStatus};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invoices table.
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceEntity {
    pub id: Uuid,
    pub number: String,
    pub user_id: Uuid,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub status: String,
    pub order_id: String,
    pub capture_id: String,
    pub payer_email: Option<String>,
    pub coupon_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<InvoiceEntity> for Invoice {
    fn from(entity: InvoiceEntity) -> Self {
        Invoice {
            id: entity.id,
            number: entity.number,
            user_id: entity.user_id,
            subtotal: entity.subtotal,
            discount: entity.discount,
            tax: entity.tax,
            total: entity.total,
            currency: entity.currency.trim_end().to_string(),
            status: entity.status.parse().unwrap_or(InvoiceStatus::Paid),
            order_id: entity.order_id,
            capture_id: entity.capture_id,
            payer_email: entity.payer_email,
            coupon_id: entity.coupon_id,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_entity_to_domain() {
        let entity = InvoiceEntity {
            id: Uuid::new_v4(),
            number: "INV-2026-0a1b2c3d".to_string(),
            user_id: Uuid::new_v4(),
            subtotal: Decimal::new(6000, 2),
            discount: Decimal::new(600, 2),
            tax: Decimal::new(720, 2),
            total: Decimal::new(6120, 2),
            currency: "USD".to_string(),
            status: "PAID".to_string(),
            order_id: "ORDER-1".to_string(),
            capture_id: "CAP-1".to_string(),
            payer_email: None,
            coupon_id: None,
            created_at: Utc::now(),
        };

        let invoice: Invoice = entity.clone().into();
        assert_eq!(invoice.number, entity.number);
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.total, Decimal::new(6120, 2));
    }

    #[test]
    fn test_char_currency_padding_is_trimmed() {
        let entity = InvoiceEntity {
            id: Uuid::new_v4(),
            number: "INV-2026-ffffffff".to_string(),
            user_id: Uuid::new_v4(),
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
            currency: "USD".to_string(),
            status: "PAID".to_string(),
            order_id: "O".to_string(),
            capture_id: "C".to_string(),
            payer_email: None,
            coupon_id: None,
            created_at: Utc::now(),
        };
        let invoice: Invoice = entity.into();
        assert_eq!(invoice.currency, "USD");
    }
}
