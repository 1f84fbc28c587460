//! Class schedule entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::schedule::ClassSchedule;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the class_schedules table. Times are UTC.
#[derive(Debug, Clone, FromRow)]
pub struct ClassScheduleEntity {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub teacher_id: Uuid,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
}

impl From<ClassScheduleEntity> for ClassSchedule {
    fn from(entity: ClassScheduleEntity) -> Self {
        ClassSchedule {
            id: entity.id,
            enrollment_id: entity.enrollment_id,
            teacher_id: entity.teacher_id,
            day_of_week: entity.day_of_week,
            start_time: entity.start_time.trim_end().to_string(),
            end_time: entity.end_time.trim_end().to_string(),
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_schedule_entity_to_domain() {
        let entity = ClassScheduleEntity {
            id: Uuid::new_v4(),
            enrollment_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            day_of_week: 2,
            start_time: "04:30".to_string(),
            end_time: "05:10".to_string(),
            created_at: Utc::now(),
        };

        let schedule: ClassSchedule = entity.clone().into();
        assert_eq!(schedule.day_of_week, 2);
        assert_eq!(schedule.start_time, "04:30");
        assert_eq!(schedule.end_time, "05:10");
    }
}
