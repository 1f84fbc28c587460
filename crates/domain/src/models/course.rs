//! Course and pricing plan domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A language course students enroll into.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A purchasable plan. Plans that include live classes point at a course
/// and carry the nominal classes-per-period count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub course_id: Option<Uuid>,
    pub name: String,
    pub includes_classes: bool,
    pub classes_per_period: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// A plan only drives enrollment when it includes classes and is tied
    /// to a concrete course.
    pub fn is_enrollable(&self) -> bool {
        self.includes_classes && self.course_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan(includes_classes: bool, course_id: Option<Uuid>) -> Plan {
        Plan {
            id: Uuid::new_v4(),
            course_id,
            name: "Conversational Group".to_string(),
            includes_classes,
            classes_per_period: 8,
            price: Decimal::new(4900, 2),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_enrollable_requires_classes_and_course() {
        assert!(sample_plan(true, Some(Uuid::new_v4())).is_enrollable());
        assert!(!sample_plan(false, Some(Uuid::new_v4())).is_enrollable());
        assert!(!sample_plan(true, None).is_enrollable());
    }

    #[test]
    fn test_plan_serializes_camel_case() {
        let plan = sample_plan(true, Some(Uuid::new_v4()));
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json.get("includesClasses").is_some());
        assert!(json.get("classesPerPeriod").is_some());
    }
}
