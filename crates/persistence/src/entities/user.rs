//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::user::{Role, User};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<String>,
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        User {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            // Unknown role strings are dropped rather than failing the row.
            roles: entity
                .roles
                .iter()
                .filter_map(|r| r.parse::<Role>().ok())
                .collect(),
            timezone: entity.timezone,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
