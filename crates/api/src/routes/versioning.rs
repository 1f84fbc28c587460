//! API versioning handlers.
//!
//! Provides redirect handlers for legacy unversioned API endpoints.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Redirect POST requests for the legacy capture endpoint.
///
/// Uses 308 Permanent Redirect: unlike 301, clients must preserve the
/// method and body, which a POST carrying payment data requires.
pub async fn redirect_payments_capture() -> Response {
    (
        StatusCode::PERMANENT_REDIRECT,
        [(header::LOCATION, "/api/v1/payments/capture")],
        "Moved to versioned API",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_redirect_payments_capture() {
        let response = redirect_payments_capture().await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/v1/payments/capture"
        );
    }
}
