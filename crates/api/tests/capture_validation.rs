//! Request validation tests for the checkout endpoints.
//!
//! Validation failures short-circuit before the first database query, so
//! these tests run against a lazy pool with no PostgreSQL instance at all.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{
    capture_body, create_test_app, get_request, guest_customer, invoice_data, json_request,
    lazy_test_pool, material_item, parse_response_body, test_config, unique_order_id, weekly_slot,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

const CAPTURE_URI: &str = "/api/v1/payments/capture";

#[tokio::test]
async fn test_capture_rejects_missing_order_id() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let body = json!({
        "invoiceData": invoice_data(vec![material_item("Textbook", "25.00")], "25.00"),
    });
    let response = app
        .oneshot(json_request(Method::POST, CAPTURE_URI, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("orderID"));
}

#[tokio::test]
async fn test_capture_rejects_blank_order_id() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let body = capture_body(
        "   ",
        invoice_data(vec![material_item("Textbook", "25.00")], "25.00"),
        Some(guest_customer("buyer@example.com")),
    );
    let response = app
        .oneshot(json_request(Method::POST, CAPTURE_URI, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_capture_rejects_missing_invoice_data() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let body = json!({ "orderID": unique_order_id() });
    let response = app
        .oneshot(json_request(Method::POST, CAPTURE_URI, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("invoiceData"));
}

#[tokio::test]
async fn test_capture_rejects_empty_items() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let body = capture_body(
        &unique_order_id(),
        invoice_data(vec![], "0.00"),
        Some(guest_customer("buyer@example.com")),
    );
    let response = app
        .oneshot(json_request(Method::POST, CAPTURE_URI, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_capture_rejects_guest_without_customer_info() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let body = capture_body(
        &unique_order_id(),
        invoice_data(vec![material_item("Textbook", "25.00")], "25.00"),
        None,
    );
    let response = app
        .oneshot(json_request(Method::POST, CAPTURE_URI, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("customerInfo"));
}

#[tokio::test]
async fn test_capture_rejects_invalid_customer_email() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let body = capture_body(
        &unique_order_id(),
        invoice_data(vec![material_item("Textbook", "25.00")], "25.00"),
        Some(json!({ "email": "not-an-email", "firstName": "Ana" })),
    );
    let response = app
        .oneshot(json_request(Method::POST, CAPTURE_URI, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_capture_rejects_out_of_range_slot_day() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let mut item = material_item("Course", "120.00");
    item["planId"] = json!(Uuid::new_v4());
    item["selectedSchedule"] = json!([weekly_slot(Uuid::new_v4(), 7, "09:00", "09:40")]);
    let body = capture_body(
        &unique_order_id(),
        invoice_data(vec![item], "120.00"),
        Some(guest_customer("buyer@example.com")),
    );
    let response = app
        .oneshot(json_request(Method::POST, CAPTURE_URI, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_capture_rejects_malformed_slot_time() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let mut item = material_item("Course", "120.00");
    item["planId"] = json!(Uuid::new_v4());
    item["selectedSchedule"] = json!([weekly_slot(Uuid::new_v4(), 1, "9am", "10am")]);
    let body = capture_body(
        &unique_order_id(),
        invoice_data(vec![item], "120.00"),
        Some(guest_customer("buyer@example.com")),
    );
    let response = app
        .oneshot(json_request(Method::POST, CAPTURE_URI, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bookings_rejects_invalid_cursor() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let uri = format!(
        "/api/v1/students/{}/bookings?after=not-a-cursor!!!",
        Uuid::new_v4()
    );
    let response = app.oneshot(get_request(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("cursor"));
}

#[tokio::test]
async fn test_legacy_capture_redirects_with_method_preserved() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let body = capture_body(
        &unique_order_id(),
        invoice_data(vec![material_item("Textbook", "25.00")], "25.00"),
        Some(guest_customer("buyer@example.com")),
    );
    let response = app
        .oneshot(json_request(Method::POST, "/api/payments/capture", body))
        .await
        .unwrap();

    // 308 keeps the POST and its body on the follow-up request.
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/api/v1/payments/capture"
    );
}

#[tokio::test]
async fn test_liveness_needs_no_database() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let response = app
        .oneshot(get_request("/api/health/live"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_request_id_echoed_on_responses() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let response = app
        .oneshot(get_request("/api/health/live"))
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let response = app
        .oneshot(get_request("/api/health/live"))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}
