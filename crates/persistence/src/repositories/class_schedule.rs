//! Class schedule repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ClassScheduleEntity;
use crate::metrics::QueryTimer;

/// Input data for inserting a recurring slot. All fields are UTC.
#[derive(Debug, Clone)]
pub struct ClassScheduleInput {
    pub enrollment_id: Uuid,
    pub teacher_id: Uuid,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
}

/// Repository for class schedule database operations.
#[derive(Clone)]
pub struct ClassScheduleRepository {
    pool: PgPool,
}

impl ClassScheduleRepository {
    /// Creates a new ClassScheduleRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a recurring slot if it does not exist yet.
    ///
    /// Uses INSERT ... ON CONFLICT to handle duplicate
    /// (enrollment_id, day_of_week, start_time) atomically.
    /// Returns (entity, was_created) tuple.
    pub async fn create_if_absent(
        &self,
        input: &ClassScheduleInput,
    ) -> Result<(ClassScheduleEntity, bool), sqlx::Error> {
        let timer = QueryTimer::new("create_class_schedule");

        let insert_result = sqlx::query(
            r#"
            INSERT INTO class_schedules (enrollment_id, teacher_id, day_of_week, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (enrollment_id, day_of_week, start_time) DO NOTHING
            "#,
        )
        .bind(input.enrollment_id)
        .bind(input.teacher_id)
        .bind(input.day_of_week)
        .bind(&input.start_time)
        .bind(&input.end_time)
        .execute(&self.pool)
        .await?;

        let was_created = insert_result.rows_affected() > 0;

        let entity = self
            .find_by_slot(input.enrollment_id, input.day_of_week, &input.start_time)
            .await?
            .expect("Schedule must exist after INSERT ON CONFLICT");

        timer.record();
        Ok((entity, was_created))
    }

    /// Find a slot by its natural key.
    pub async fn find_by_slot(
        &self,
        enrollment_id: Uuid,
        day_of_week: i16,
        start_time: &str,
    ) -> Result<Option<ClassScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_class_schedule_by_slot");

        let result = sqlx::query_as::<_, ClassScheduleEntity>(
            r#"
            SELECT id, enrollment_id, teacher_id, day_of_week, start_time, end_time, created_at
            FROM class_schedules
            WHERE enrollment_id = $1 AND day_of_week = $2 AND start_time = $3
            "#,
        )
        .bind(enrollment_id)
        .bind(day_of_week)
        .bind(start_time)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// All recurring slots of an enrollment.
    pub async fn find_for_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> Result<Vec<ClassScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_class_schedules_for_enrollment");

        let result = sqlx::query_as::<_, ClassScheduleEntity>(
            r#"
            SELECT id, enrollment_id, teacher_id, day_of_week, start_time, end_time, created_at
            FROM class_schedules
            WHERE enrollment_id = $1
            ORDER BY day_of_week, start_time
            "#,
        )
        .bind(enrollment_id)
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
    fn test_class_schedule_input_creation() {
        let input = ClassScheduleInput {
            enrollment_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            day_of_week: 2,
            start_time: "04:30".to_string(),
            end_time: "05:10".to_string(),
        };

        assert_eq!(input.day_of_week, 2);
        assert_eq!(input.start_time, "04:30");
    }
}
