//! Invoice repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{InvoiceEntity, PurchaseEntity};
use crate::metrics::QueryTimer;

/// Input data for inserting an invoice.
#[derive(Debug, Clone)]
pub struct InvoiceInput {
    pub number: String,
    pub user_id: Uuid,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub order_id: String,
    pub capture_id: String,
    pub payer_email: Option<String>,
    pub coupon_id: Option<Uuid>,
}

/// Input data for inserting a purchase line item.
#[derive(Debug, Clone)]
pub struct PurchaseInput {
    pub product_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    /// Weekly slot snapshot as selected at checkout, already serialized.
    pub selected_schedule: Option<serde_json::Value>,
    pub prorated_classes: Option<i32>,
    pub prorated_price: Option<Decimal>,
}

/// Repository for invoice database operations.
#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a paid invoice together with its purchases.
    ///
    /// One transaction: either the whole receipt exists or none of it.
    /// Purchases start out CONFIRMED; enrollment happens afterwards.
    pub async fn create_with_purchases(
        &self,
        invoice: InvoiceInput,
        items: Vec<PurchaseInput>,
    ) -> Result<(InvoiceEntity, Vec<PurchaseEntity>), sqlx::Error> {
        let timer = QueryTimer::new("create_invoice_with_purchases");

        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, InvoiceEntity>(
            r#"
            INSERT INTO invoices (
                number, user_id, subtotal, discount, tax, total, currency,
                status, order_id, capture_id, payer_email, coupon_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'PAID', $8, $9, $10, $11)
            RETURNING id, number, user_id, subtotal, discount, tax, total, currency,
                      status, order_id, capture_id, payer_email, coupon_id, created_at
            "#,
        )
        .bind(&invoice.number)
        .bind(invoice.user_id)
        .bind(invoice.subtotal)
        .bind(invoice.discount)
        .bind(invoice.tax)
        .bind(invoice.total)
        .bind(&invoice.currency)
        .bind(&invoice.order_id)
        .bind(&invoice.capture_id)
        .bind(&invoice.payer_email)
        .bind(invoice.coupon_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut purchases = Vec::with_capacity(items.len());
        for item in &items {
            let purchase = sqlx::query_as::<_, PurchaseEntity>(
                r#"
                INSERT INTO purchases (
                    invoice_id, product_id, plan_id, name, unit_price, quantity,
                    status, selected_schedule, prorated_classes, prorated_price
                )
                VALUES ($1, $2, $3, $4, $5, $6, 'CONFIRMED', $7, $8, $9)
                RETURNING id, invoice_id, product_id, plan_id, name, unit_price, quantity,
                          status, selected_schedule, prorated_classes, prorated_price,
                          enrollment_id, created_at
                "#,
            )
            .bind(created.id)
            .bind(item.product_id)
            .bind(item.plan_id)
            .bind(&item.name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .bind(&item.selected_schedule)
            .bind(item.prorated_classes)
            .bind(item.prorated_price)
            .fetch_one(&mut *tx)
            .await?;
            purchases.push(purchase);
        }

        tx.commit().await?;
        timer.record();
        Ok((created, purchases))
    }

    /// Find invoice by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InvoiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invoice_by_id");

        let result = sqlx::query_as::<_, InvoiceEntity>(
            r#"
            SELECT id, number, user_id, subtotal, discount, tax, total, currency,
                   status, order_id, capture_id, payer_email, coupon_id, created_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// All purchases on an invoice, oldest first.
    pub async fn find_purchases(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<PurchaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invoice_purchases");

        let result = sqlx::query_as::<_, PurchaseEntity>(
            r#"
            SELECT id, invoice_id, product_id, plan_id, name, unit_price, quantity,
                   status, selected_schedule, prorated_classes, prorated_price,
                   enrollment_id, created_at
            FROM purchases
            WHERE invoice_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_input_creation() {
        let input = InvoiceInput {
            number: "INV-2026-0a1b2c3d".to_string(),
            user_id: Uuid::new_v4(),
            subtotal: Decimal::new(6000, 2),
            discount: Decimal::new(600, 2),
            tax: Decimal::new(720, 2),
            total: Decimal::new(6120, 2),
            currency: "USD".to_string(),
            order_id: "ORDER-1".to_string(),
            capture_id: "CAP-1".to_string(),
            payer_email: Some("payer@example.com".to_string()),
            coupon_id: None,
        };

        assert_eq!(input.number, "INV-2026-0a1b2c3d");
        assert_eq!(input.total, Decimal::new(6120, 2));
    }

    #[test]
    fn test_purchase_input_with_schedule_snapshot() {
        let input = PurchaseInput {
            product_id: Uuid::new_v4(),
            plan_id: Some(Uuid::new_v4()),
            name: "English B1".to_string(),
            unit_price: Decimal::new(4900, 2),
            quantity: 1,
            selected_schedule: Some(serde_json::json!([{
                "teacherId": "00000000-0000-0000-0000-000000000030",
                "dayOfWeek": 1,
                "startTime": "09:00",
                "endTime": "09:40"
            }])),
            prorated_classes: None,
            prorated_price: None,
        };

        assert!(input.selected_schedule.is_some());
        assert_eq!(input.quantity, 1);
    }
}
