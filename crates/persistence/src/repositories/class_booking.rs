//! Class booking repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ClassBookingEntity;
use crate::metrics::QueryTimer;

/// Input data for inserting a dated booking.
#[derive(Debug, Clone)]
pub struct ClassBookingInput {
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub enrollment_id: Uuid,
    /// UTC calendar date, `YYYY-MM-DD`.
    pub day: String,
    /// UTC range label, `HH:MM-HH:MM`.
    pub time_slot: String,
}

/// Query parameters for booking pagination.
#[derive(Debug, Clone)]
pub struct BookingQuery {
    pub student_id: Uuid,
    pub cursor_day: Option<String>,
    pub cursor_id: Option<Uuid>,
    pub limit: i32,
}

/// Repository for class booking database operations.
#[derive(Clone)]
pub struct ClassBookingRepository {
    pool: PgPool,
}

impl ClassBookingRepository {
    /// Creates a new ClassBookingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a dated booking if it does not exist yet.
    ///
    /// Uses INSERT ... ON CONFLICT to handle duplicate
    /// (student_id, teacher_id, day, time_slot) atomically.
    /// Returns (entity, was_created) tuple.
    pub async fn create_if_absent(
        &self,
        input: &ClassBookingInput,
    ) -> Result<(ClassBookingEntity, bool), sqlx::Error> {
        let timer = QueryTimer::new("create_class_booking");

        let insert_result = sqlx::query(
            r#"
            INSERT INTO class_bookings (student_id, teacher_id, enrollment_id, day, time_slot)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, teacher_id, day, time_slot) DO NOTHING
            "#,
        )
        .bind(input.student_id)
        .bind(input.teacher_id)
        .bind(input.enrollment_id)
        .bind(&input.day)
        .bind(&input.time_slot)
        .execute(&self.pool)
        .await?;

        let was_created = insert_result.rows_affected() > 0;

        let entity = self
            .find_by_occurrence(
                input.student_id,
                input.teacher_id,
                &input.day,
                &input.time_slot,
            )
            .await?
            .expect("Booking must exist after INSERT ON CONFLICT");

        timer.record();
        Ok((entity, was_created))
    }

    /// Find a booking by its natural key.
    pub async fn find_by_occurrence(
        &self,
        student_id: Uuid,
        teacher_id: Uuid,
        day: &str,
        time_slot: &str,
    ) -> Result<Option<ClassBookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_class_booking_by_occurrence");

        let result = sqlx::query_as::<_, ClassBookingEntity>(
            r#"
            SELECT id, student_id, teacher_id, enrollment_id, day, time_slot, status, created_at
            FROM class_bookings
            WHERE student_id = $1 AND teacher_id = $2 AND day = $3 AND time_slot = $4
            "#,
        )
        .bind(student_id)
        .bind(teacher_id)
        .bind(day)
        .bind(time_slot)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Bookings of a student with keyset pagination, earliest day first.
    pub async fn list_for_student(
        &self,
        query: BookingQuery,
    ) -> Result<(Vec<ClassBookingEntity>, bool), sqlx::Error> {
        let timer = QueryTimer::new("list_class_bookings_for_student");

        // Fetch limit + 1 to determine if more results exist
        let fetch_limit = (query.limit + 1) as i64;

        let bookings = sqlx::query_as::<_, ClassBookingEntity>(
            r#"
            SELECT id, student_id, teacher_id, enrollment_id, day, time_slot, status, created_at
            FROM class_bookings
            WHERE student_id = $1
              AND ($2::text IS NULL OR (day, id) > ($2, $3))
            ORDER BY day ASC, id ASC
            LIMIT $4
            "#,
        )
        .bind(query.student_id)
        .bind(&query.cursor_day)
        // Nil UUID keeps the whole cursor day included when cursor_id is absent
        .bind(query.cursor_id.unwrap_or(Uuid::nil()))
        .bind(fetch_limit)
        .fetch_all(&self.pool)
        .await?;

        timer.record();

        let has_more = bookings.len() > query.limit as usize;
        let mut result = bookings;
        if has_more {
            result.pop();
        }

        Ok((result, has_more))
    }

    /// All bookings of an enrollment, earliest day first.
    pub async fn find_for_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> Result<Vec<ClassBookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_class_bookings_for_enrollment");

        let result = sqlx::query_as::<_, ClassBookingEntity>(
            r#"
            SELECT id, student_id, teacher_id, enrollment_id, day, time_slot, status, created_at
            FROM class_bookings
            WHERE enrollment_id = $1
            ORDER BY day ASC, id ASC
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
    fn test_class_booking_input_creation() {
        let input = ClassBookingInput {
            student_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            enrollment_id: Uuid::new_v4(),
            day: "2026-03-02".to_string(),
            time_slot: "14:00-14:40".to_string(),
        };

        assert_eq!(input.day, "2026-03-02");
        assert_eq!(input.time_slot, "14:00-14:40");
    }

    #[test]
    fn test_booking_query_defaults() {
        let query = BookingQuery {
            student_id: Uuid::new_v4(),
            cursor_day: None,
            cursor_id: None,
            limit: 20,
        };

        assert_eq!(query.limit, 20);
        assert!(query.cursor_day.is_none());
    }
}
