//! Course and plan repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CourseEntity, PlanEntity};
use crate::metrics::QueryTimer;

/// Repository for course catalog lookups.
#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Creates a new CourseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find course by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_course_by_id");

        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT id, title, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find plan by ID.
    pub async fn find_plan_by_id(&self, id: Uuid) -> Result<Option<PlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plan_by_id");

        let result = sqlx::query_as::<_, PlanEntity>(
            r#"
            SELECT id, course_id, name, includes_classes, classes_per_period, price, created_at
            FROM plans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }
}
