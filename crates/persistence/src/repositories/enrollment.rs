//! Enrollment repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EnrollmentEntity;
use crate::metrics::QueryTimer;

/// Input data for the enrollment upsert.
#[derive(Debug, Clone)]
pub struct EnrollmentUpsertInput {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub academic_period_id: Uuid,
    /// Teacher of the first selected slot; kept only if the enrollment has
    /// none yet.
    pub teacher_id: Option<Uuid>,
    pub classes_total: i32,
    /// The purchase being provisioned; promoted to ENROLLED in the same
    /// transaction.
    pub purchase_id: Uuid,
}

/// Repository for enrollment database operations.
#[derive(Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    /// Creates a new EnrollmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create or reactivate the enrollment for a purchase and promote the
    /// purchase, atomically.
    ///
    /// The upsert targets the (student, course, period) natural key; an
    /// existing teacher assignment always wins over the incoming candidate.
    pub async fn upsert_for_purchase(
        &self,
        input: EnrollmentUpsertInput,
    ) -> Result<EnrollmentEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_enrollment_for_purchase");

        let mut tx = self.pool.begin().await?;

        let enrollment = sqlx::query_as::<_, EnrollmentEntity>(
            r#"
            INSERT INTO enrollments (
                student_id, course_id, academic_period_id, teacher_id, status, classes_total
            )
            VALUES ($1, $2, $3, $4, 'ACTIVE', $5)
            ON CONFLICT (student_id, course_id, academic_period_id) DO UPDATE SET
                status = 'ACTIVE',
                classes_total = EXCLUDED.classes_total,
                teacher_id = COALESCE(enrollments.teacher_id, EXCLUDED.teacher_id),
                updated_at = NOW()
            RETURNING id, student_id, course_id, academic_period_id, teacher_id, status,
                      classes_total, classes_attended, classes_missed, created_at, updated_at
            "#,
        )
        .bind(input.student_id)
        .bind(input.course_id)
        .bind(input.academic_period_id)
        .bind(input.teacher_id)
        .bind(input.classes_total)
        .fetch_one(&mut *tx)
        .await?;

        // Forward-only: a purchase already ENROLLED is left alone.
        sqlx::query(
            r#"
            UPDATE purchases
            SET enrollment_id = $2, status = 'ENROLLED'
            WHERE id = $1 AND status = 'CONFIRMED'
            "#,
        )
        .bind(input.purchase_id)
        .bind(enrollment.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(enrollment)
    }

    /// Find enrollment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EnrollmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_enrollment_by_id");

        let result = sqlx::query_as::<_, EnrollmentEntity>(
            r#"
            SELECT id, student_id, course_id, academic_period_id, teacher_id, status,
                   classes_total, classes_attended, classes_missed, created_at, updated_at
            FROM enrollments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find enrollment by its natural key.
    pub async fn find_by_natural_key(
        &self,
        student_id: Uuid,
        course_id: Uuid,
        academic_period_id: Uuid,
    ) -> Result<Option<EnrollmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_enrollment_by_natural_key");

        let result = sqlx::query_as::<_, EnrollmentEntity>(
            r#"
            SELECT id, student_id, course_id, academic_period_id, teacher_id, status,
                   classes_total, classes_attended, classes_missed, created_at, updated_at
            FROM enrollments
            WHERE student_id = $1 AND course_id = $2 AND academic_period_id = $3
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .bind(academic_period_id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_input_creation() {
        let input = EnrollmentUpsertInput {
            student_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            academic_period_id: Uuid::new_v4(),
            teacher_id: Some(Uuid::new_v4()),
            classes_total: 8,
            purchase_id: Uuid::new_v4(),
        };

        assert_eq!(input.classes_total, 8);
        assert!(input.teacher_id.is_some());
    }
}
