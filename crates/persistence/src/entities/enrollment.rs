//! Enrollment entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::enrollment::{Enrollment, EnrollmentStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the enrollments table.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub academic_period_id: Uuid,
    pub teacher_id: Option<Uuid>,
    pub status: String,
    pub classes_total: i32,
    pub classes_attended: i32,
    pub classes_missed: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EnrollmentEntity> for Enrollment {
    fn from(entity: EnrollmentEntity) -> Self {
        Enrollment {
            id: entity.id,
            student_id: entity.student_id,
            course_id: entity.course_id,
            academic_period_id: entity.academic_period_id,
            teacher_id: entity.teacher_id,
            status: entity.status.parse().unwrap_or(EnrollmentStatus::Active),
            classes_total: entity.classes_total,
            classes_attended: entity.classes_attended,
            classes_missed: entity.classes_missed,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_entity_to_domain() {
        let now = Utc::now();
        let entity = EnrollmentEntity {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            academic_period_id: Uuid::new_v4(),
            teacher_id: Some(Uuid::new_v4()),
            status: "ACTIVE".to_string(),
            classes_total: 8,
            classes_attended: 0,
            classes_missed: 0,
            created_at: now,
            updated_at: now,
        };

        let enrollment: Enrollment = entity.clone().into();
        assert_eq!(enrollment.id, entity.id);
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(enrollment.classes_total, 8);
        assert!(enrollment.teacher_id.is_some());
    }
}
