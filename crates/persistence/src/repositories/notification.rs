//! Notification repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use crate::metrics::QueryTimer;

/// Input data for inserting an in-platform notification.
#[derive(Debug, Clone)]
pub struct NotificationInput {
    pub user_id: Option<Uuid>,
    pub kind: String,
    pub payload: serde_json::Value,
}

/// Repository for notification database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a notification.
    pub async fn create(
        &self,
        input: NotificationInput,
    ) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_notification");

        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (user_id, kind, payload)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, kind, payload, read, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.kind)
        .bind(&input.payload)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Unread notifications of a user, newest first.
    pub async fn find_unread_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_unread_notifications");

        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT id, user_id, kind, payload, read, created_at
            FROM notifications
            WHERE user_id = $1 AND read = FALSE
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
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
    fn test_notification_input_creation() {
        let input = NotificationInput {
            user_id: Some(Uuid::new_v4()),
            kind: "new_purchase".to_string(),
            payload: serde_json::json!({"total": 49.0}),
        };

        assert_eq!(input.kind, "new_purchase");
        assert!(input.user_id.is_some());
    }
}
