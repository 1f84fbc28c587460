//! Academic period repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AcademicPeriodEntity;
use crate::metrics::QueryTimer;

/// Repository for academic period resolution.
#[derive(Clone)]
pub struct AcademicPeriodRepository {
    pool: PgPool,
}

impl AcademicPeriodRepository {
    /// Creates a new AcademicPeriodRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find period by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AcademicPeriodEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_period_by_id");

        let result = sqlx::query_as::<_, AcademicPeriodEntity>(
            r#"
            SELECT id, name, start_date, end_date, is_special_week, created_at
            FROM academic_periods
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Resolve the period a purchase made today enrolls into.
    ///
    /// A period containing today wins; otherwise the nearest upcoming one.
    /// Special weeks never resolve. None means provisioning soft-fails for
    /// the item.
    pub async fn resolve_current(
        &self,
        today: NaiveDate,
    ) -> Result<Option<AcademicPeriodEntity>, sqlx::Error> {
        let timer = QueryTimer::new("resolve_current_period");

        let containing = sqlx::query_as::<_, AcademicPeriodEntity>(
            r#"
            SELECT id, name, start_date, end_date, is_special_week, created_at
            FROM academic_periods
            WHERE start_date <= $1 AND end_date >= $1 AND is_special_week = FALSE
            ORDER BY start_date
            LIMIT 1
            "#,
        )
        .bind(today)
        .fetch_optional(&self.pool)
        .await?;

        if containing.is_some() {
            timer.record();
            return Ok(containing);
        }

        let upcoming = sqlx::query_as::<_, AcademicPeriodEntity>(
            r#"
            SELECT id, name, start_date, end_date, is_special_week, created_at
            FROM academic_periods
            WHERE start_date >= $1 AND is_special_week = FALSE
            ORDER BY start_date ASC
            LIMIT 1
            "#,
        )
        .bind(today)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        upcoming
    }
}
