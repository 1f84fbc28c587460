//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");

        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, first_name, last_name, roles, timezone, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find user by email, case-insensitive.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");

        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, first_name, last_name, roles, timezone, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Resolve an unexpired session token to its user.
    pub async fn find_by_session_token(
        &self,
        token: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_session_token");

        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT u.id, u.email, u.first_name, u.last_name, u.roles, u.timezone,
                   u.created_at, u.updated_at
            FROM users u
            JOIN sessions s ON s.user_id = u.id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find a user by email or create a guest account for it.
    ///
    /// Uses INSERT ... ON CONFLICT to handle concurrent checkouts for the
    /// same email atomically. Returns (entity, was_created) tuple.
    pub async fn find_or_create_by_email(
        &self,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<(UserEntity, bool), sqlx::Error> {
        let timer = QueryTimer::new("find_or_create_user_by_email");

        let insert_result = sqlx::query(
            r#"
            INSERT INTO users (email, first_name, last_name, roles)
            VALUES (LOWER($1), $2, $3, '{GUEST}')
            ON CONFLICT (LOWER(email)) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .execute(&self.pool)
        .await?;

        let was_created = insert_result.rows_affected() > 0;

        let entity = self
            .find_by_email(email)
            .await?
            .expect("User must exist after INSERT ON CONFLICT");

        timer.record();
        Ok((entity, was_created))
    }

    /// Promote a user to STUDENT, dropping GUEST, in one atomic statement.
    ///
    /// No-op when the user already holds STUDENT; other roles are never
    /// touched. Returns whether the row changed.
    pub async fn promote_to_student(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("promote_user_to_student");

        let result = sqlx::query(
            r#"
            UPDATE users
            SET roles = array_append(array_remove(roles, 'GUEST'), 'STUDENT'),
                updated_at = NOW()
            WHERE id = $1 AND NOT ('STUDENT' = ANY(roles))
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
