//! Coupon entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::coupon::Coupon;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the coupons table.
#[derive(Debug, Clone, FromRow)]
pub struct CouponEntity {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: Decimal,
    pub usage_count: i32,
    pub max_uses: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<CouponEntity> for Coupon {
    fn from(entity: CouponEntity) -> Self {
        Coupon {
            id: entity.id,
            code: entity.code,
            discount_percent: entity.discount_percent,
            usage_count: entity.usage_count,
            max_uses: entity.max_uses,
            created_at: entity.created_at,
        }
    }
}
