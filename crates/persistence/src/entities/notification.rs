//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub kind: String,
    pub payload: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_entity_fields() {
        let entity = NotificationEntity {
            id: Uuid::new_v4(),
            user_id: Some(Uuid::new_v4()),
            kind: "new_purchase".to_string(),
            payload: serde_json::json!({"invoiceNumber": "INV-2026-0a1b2c3d"}),
            read: false,
            created_at: Utc::now(),
        };

        assert_eq!(entity.kind, "new_purchase");
        assert!(!entity.read);
        assert_eq!(entity.payload["invoiceNumber"], "INV-2026-0a1b2c3d");
    }
}
