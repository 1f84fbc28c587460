use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::{MockGateway, PaymentGateway, PurchaseNotifier};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{bookings, health, invoices, payments, purchases, versioning};
use crate::services::{EmailService, PayPalGateway, PlatformNotifier};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub email: EmailService,
    pub notifier: Arc<dyn PurchaseNotifier>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    // Select the payment gateway from configuration. Anything other than
    // "paypal" falls back to the mock gateway, which approves every capture.
    let gateway: Arc<dyn PaymentGateway> = match config.payments.gateway.as_str() {
        "paypal" => Arc::new(PayPalGateway::new(&config.payments)),
        _ => Arc::new(MockGateway::completing()),
    };
    let notifier: Arc<dyn PurchaseNotifier> = Arc::new(PlatformNotifier::new(pool.clone()));

    create_app_with_gateway(config, pool, gateway, notifier)
}

/// Build the router with explicit gateway and notifier implementations.
/// Integration tests use this to inject mock gateways.
pub fn create_app_with_gateway(
    config: Config,
    pool: PgPool,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn PurchaseNotifier>,
) -> Router {
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let email = EmailService::new(config.email.clone());

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
        gateway,
        email,
        notifier,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Capture route gets per-client rate limiting. The remaining v1 routes
    // are reads or idempotent updates keyed by unguessable UUIDs.
    let capture_routes = Router::new()
        .route(
            "/api/v1/payments/capture",
            post(payments::capture_order),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let api_routes = Router::new()
        .route(
            "/api/v1/purchases/:purchase_id/schedule",
            post(purchases::select_schedule),
        )
        .route(
            "/api/v1/invoices/:invoice_id",
            get(invoices::get_invoice),
        )
        .route(
            "/api/v1/students/:student_id/bookings",
            get(bookings::list_student_bookings),
        );

    // Legacy routes - redirect to v1 with 308 Permanent Redirect
    let legacy_routes = Router::new().route(
        "/api/payments/capture",
        post(versioning::redirect_payments_capture),
    );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(capture_routes)
        .merge(api_routes)
        .merge(legacy_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
