//! Purchase repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PurchaseEntity;
use crate::metrics::QueryTimer;

/// Repository for purchase database operations.
#[derive(Clone)]
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find purchase by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PurchaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_purchase_by_id");

        let result = sqlx::query_as::<_, PurchaseEntity>(
            r#"
            SELECT id, invoice_id, product_id, plan_id, name, unit_price, quantity,
                   status, selected_schedule, prorated_classes, prorated_price,
                   enrollment_id, created_at
            FROM purchases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Store a late schedule selection on a purchase.
    ///
    /// Only purchases still waiting on enrollment accept a snapshot.
    pub async fn set_selected_schedule(
        &self,
        id: Uuid,
        snapshot: serde_json::Value,
    ) -> Result<Option<PurchaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_purchase_selected_schedule");

        let result = sqlx::query_as::<_, PurchaseEntity>(
            r#"
            UPDATE purchases
            SET selected_schedule = $2
            WHERE id = $1 AND status = 'CONFIRMED'
            RETURNING id, invoice_id, product_id, plan_id, name, unit_price, quantity,
                      status, selected_schedule, prorated_classes, prorated_price,
                      enrollment_id, created_at
            "#,
        )
        .bind(id)
        .bind(snapshot)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }
}
