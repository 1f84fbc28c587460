//! Coupon domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A discount coupon. Usage is counted once per invoice it was applied to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: Decimal,
    pub usage_count: i32,
    pub max_uses: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    pub fn has_uses_left(&self) -> bool {
        match self.max_uses {
            Some(max) => self.usage_count < max,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(usage_count: i32, max_uses: Option<i32>) -> Coupon {
        Coupon {
            id: Uuid::new_v4(),
            code: "WELCOME10".to_string(),
            discount_percent: Decimal::new(10, 0),
            usage_count,
            max_uses,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unlimited_coupon_always_has_uses() {
        assert!(coupon(10_000, None).has_uses_left());
    }

    #[test]
    fn test_capped_coupon_exhausts() {
        assert!(coupon(4, Some(5)).has_uses_left());
        assert!(!coupon(5, Some(5)).has_uses_left());
        assert!(!coupon(6, Some(5)).has_uses_left());
    }
}
