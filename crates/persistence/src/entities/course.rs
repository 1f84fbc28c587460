//! Course and plan entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::course::{Course, Plan};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the courses table.
#[derive(Debug, Clone, FromRow)]
pub struct CourseEntity {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<CourseEntity> for Course {
    fn from(entity: CourseEntity) -> Self {
        Course {
            id: entity.id,
            title: entity.title,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the plans table.
#[derive(Debug, Clone, FromRow)]
pub struct PlanEntity {
    pub id: Uuid,
    pub course_id: Option<Uuid>,
    pub name: String,
    pub includes_classes: bool,
    pub classes_per_period: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<PlanEntity> for Plan {
    fn from(entity: PlanEntity) -> Self {
        Plan {
            id: entity.id,
            course_id: entity.course_id,
            name: entity.name,
            includes_classes: entity.includes_classes,
            classes_per_period: entity.classes_per_period,
            price: entity.price,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_entity_to_domain() {
        let entity = PlanEntity {
            id: Uuid::new_v4(),
            course_id: Some(Uuid::new_v4()),
            name: "Standard".to_string(),
            includes_classes: true,
            classes_per_period: 8,
            price: Decimal::new(4900, 2),
            created_at: Utc::now(),
        };

        let plan: Plan = entity.clone().into();
        assert_eq!(plan.id, entity.id);
        assert!(plan.is_enrollable());
        assert_eq!(plan.classes_per_period, 8);
    }
}
