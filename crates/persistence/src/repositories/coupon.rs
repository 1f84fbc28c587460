//! Coupon repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CouponEntity;
use crate::metrics::QueryTimer;

/// Repository for coupon lookups and usage accounting.
#[derive(Clone)]
pub struct CouponRepository {
    pool: PgPool,
}

impl CouponRepository {
    /// Creates a new CouponRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find coupon by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CouponEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_coupon_by_id");

        let result = sqlx::query_as::<_, CouponEntity>(
            r#"
            SELECT id, code, discount_percent, usage_count, max_uses, created_at
            FROM coupons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Count one use of the coupon. Called once per invoice it was applied
    /// to, never per line item. Returns whether a row was updated.
    pub async fn increment_usage(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("increment_coupon_usage");

        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET usage_count = usage_count + 1
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
