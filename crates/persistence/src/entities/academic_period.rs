//! Academic period entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::academic_period::AcademicPeriod;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the academic_periods table.
#[derive(Debug, Clone, FromRow)]
pub struct AcademicPeriodEntity {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_special_week: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AcademicPeriodEntity> for AcademicPeriod {
    fn from(entity: AcademicPeriodEntity) -> Self {
        AcademicPeriod {
            id: entity.id,
            name: entity.name,
            start_date: entity.start_date,
            end_date: entity.end_date,
            is_special_week: entity.is_special_week,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academic_period_entity_to_domain() {
        let entity = AcademicPeriodEntity {
            id: Uuid::new_v4(),
            name: "March 2026".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            is_special_week: false,
            created_at: Utc::now(),
        };

        let period: AcademicPeriod = entity.clone().into();
        assert_eq!(period.id, entity.id);
        assert!(!period.is_special_week);
        assert!(period.contains(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
    }
}
