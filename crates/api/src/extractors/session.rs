//! Session authentication extractor.
//!
//! Provides an Axum extractor for resolving the user behind a session
//! bearer token.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sqlx::PgPool;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::User;
use persistence::repositories::UserRepository;

/// Authenticated session user.
///
/// This extractor validates the `Authorization: Bearer <token>` header
/// against active sessions and provides the resolved user.
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

impl SessionUser {
    /// Resolves a session token to a user.
    ///
    /// This is the core authentication logic, extracted for testability.
    pub async fn validate(pool: &PgPool, token: &str) -> Result<User, ApiError> {
        if token.is_empty() {
            return Err(ApiError::Unauthorized(
                "Invalid or missing session token".to_string(),
            ));
        }

        let repo = UserRepository::new(pool.clone());
        let entity = repo
            .find_by_session_token(token)
            .await
            .map_err(|e| {
                tracing::error!("Database error during session lookup: {}", e);
                ApiError::Internal("Authentication service unavailable".to_string())
            })?
            .ok_or_else(|| {
                ApiError::Unauthorized("Invalid or missing session token".to_string())
            })?;

        Ok(User::from(entity))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            ApiError::Unauthorized("Invalid or missing session token".to_string())
        })?;

        Ok(SessionUser(Self::validate(&state.pool, token).await?))
    }
}

/// Optional session authentication.
///
/// Resolves to `None` when no Authorization header is present, so guest
/// checkout keeps working. A header that IS present but does not match an
/// active session is rejected with 401 rather than silently downgraded to
/// a guest: a stale token on a returning customer must not fork their
/// purchase history onto a second account.
#[derive(Debug, Clone)]
pub struct OptionalSessionUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalSessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => {
                let user = SessionUser::validate(&state.pool, token).await?;
                Ok(OptionalSessionUser(Some(user)))
            }
            None => Ok(OptionalSessionUser(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::Role;
    use uuid::Uuid;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "student@example.com".to_string(),
            first_name: Some("Ana".to_string()),
            last_name: Some("Torres".to_string()),
            roles: vec![Role::Student],
            timezone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_user_struct() {
        let user = sample_user();
        let email = user.email.clone();
        let session = SessionUser(user);
        assert_eq!(session.0.email, email);
        assert!(session.0.is_student());
    }

    #[test]
    fn test_session_user_clone() {
        let session = SessionUser(sample_user());
        let cloned = session.clone();
        assert_eq!(cloned.0.id, session.0.id);
        assert_eq!(cloned.0.email, session.0.email);
    }

    #[test]
    fn test_optional_session_user_some() {
        let optional = OptionalSessionUser(Some(sample_user()));
        assert!(optional.0.is_some());
    }

    #[test]
    fn test_optional_session_user_none() {
        let optional = OptionalSessionUser(None);
        assert!(optional.0.is_none());
    }

    #[test]
    fn test_optional_session_user_debug() {
        let optional = OptionalSessionUser(None);
        let debug_str = format!("{:?}", optional);
        assert!(debug_str.contains("OptionalSessionUser"));
    }
}
