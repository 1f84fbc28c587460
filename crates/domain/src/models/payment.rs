//! Payment capture request/response DTOs.
//!
//! Shapes follow the storefront contract: camelCase keys, with the
//! gateway-facing ids spelled `orderID` / `captureID`.

use crate::models::enrollment::EnrollmentSummary;
use crate::models::invoice::Invoice;
use crate::models::purchase::Purchase;
use crate::models::schedule::WeeklySlot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /api/v1/payments/capture`.
///
/// `order_id` and `invoice_data` are semantically required; they stay
/// optional here so the handler can answer with the workflow's own 400
/// instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOrderRequest {
    #[serde(rename = "orderID", default)]
    pub order_id: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub invoice_data: Option<InvoiceData>,

    /// Required when the caller has no session; used to find-or-create a
    /// guest account by email.
    #[serde(default)]
    #[validate(nested)]
    pub customer_info: Option<CustomerInfo>,
}

/// Cart totals and line items as computed by the storefront.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    #[validate(length(min = 1, message = "Invoice must contain at least one item"))]
    #[validate(nested)]
    pub items: Vec<PurchaseItem>,

    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,

    /// ISO 4217 code; defaults to USD when absent.
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub coupon_id: Option<Uuid>,
}

/// One cart line item.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub product_id: Uuid,

    #[serde(default)]
    pub plan_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Item name must be 1-200 characters"))]
    pub name: String,

    pub price: Decimal,

    #[validate(custom(function = "shared::validation::validate_quantity"))]
    pub quantity: i32,

    /// Weekly slots picked at checkout, teacher-local wall clock.
    #[serde(default)]
    #[validate(nested)]
    pub selected_schedule: Option<Vec<WeeklySlot>>,

    #[serde(default)]
    pub prorated_classes: Option<i32>,

    #[serde(default)]
    pub prorated_price: Option<Decimal>,
}

/// Buyer identity for sessionless checkouts.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub zip_code: Option<String>,
}

/// Success body of the capture endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOrderResponse {
    pub success: bool,

    #[serde(rename = "captureID")]
    pub capture_id: String,

    /// Gateway capture status, e.g. `COMPLETED`.
    pub status: String,

    pub invoice: Invoice,
    pub purchases: Vec<Purchase>,

    /// True when at least one class-inclusive purchase is still waiting
    /// for a weekly schedule while a period is open.
    pub needs_schedule_setup: bool,

    pub enrollments: Vec<EnrollmentSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32) -> PurchaseItem {
        PurchaseItem {
            product_id: Uuid::new_v4(),
            plan_id: Some(Uuid::new_v4()),
            name: "English B1".to_string(),
            price: Decimal::new(4900, 2),
            quantity,
            selected_schedule: None,
            prorated_classes: None,
            prorated_price: None,
        }
    }

    #[test]
    fn test_capture_request_parses_storefront_shape() {
        let json = r#"{
            "orderID": "5O190127TN364715T",
            "invoiceData": {
                "items": [{
                    "productId": "00000000-0000-0000-0000-000000000010",
                    "planId": "00000000-0000-0000-0000-000000000020",
                    "name": "English B1",
                    "price": 49.0,
                    "quantity": 1,
                    "selectedSchedule": [{
                        "teacherId": "00000000-0000-0000-0000-000000000030",
                        "dayOfWeek": 1,
                        "startTime": "09:00",
                        "endTime": "09:40"
                    }]
                }],
                "subtotal": 49.0,
                "tax": 0.0,
                "discount": 0.0,
                "total": 49.0
            },
            "customerInfo": {
                "email": "buyer@example.com",
                "firstName": "Ana"
            }
        }"#;
        let req: CaptureOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.order_id.as_deref(), Some("5O190127TN364715T"));
        let data = req.invoice_data.unwrap();
        assert_eq!(data.items.len(), 1);
        assert!(data.items[0].selected_schedule.is_some());
        assert!(req.customer_info.is_some());
        assert!(data.currency.is_none());
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let req: CaptureOrderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.order_id.is_none());
        assert!(req.invoice_data.is_none());
        assert!(req.customer_info.is_none());
    }

    #[test]
    fn test_empty_items_fail_validation() {
        let data = InvoiceData {
            items: vec![],
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
            currency: None,
            coupon_id: None,
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_zero_quantity_fails_validation() {
        let bad = item(0);
        assert!(bad.validate().is_err());
        assert!(item(1).validate().is_ok());
    }

    #[test]
    fn test_invalid_nested_slot_fails_validation() {
        let mut it = item(1);
        it.selected_schedule = Some(vec![WeeklySlot {
            teacher_id: Uuid::new_v4(),
            day_of_week: 9,
            start_time: "09:00".to_string(),
            end_time: "09:40".to_string(),
        }]);
        let data = InvoiceData {
            items: vec![it],
            subtotal: Decimal::new(4900, 2),
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::new(4900, 2),
            currency: None,
            coupon_id: None,
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_customer_info_requires_valid_email() {
        let info = CustomerInfo {
            email: "not-an-email".to_string(),
            first_name: "Ana".to_string(),
            last_name: None,
            address: None,
            country: None,
            city: None,
            zip_code: None,
        };
        assert!(info.validate().is_err());
    }

    #[test]
    fn test_response_uses_capture_id_spelling() {
        let json = serde_json::json!({
            "success": true,
            "captureID": "CAP-1",
            "status": "COMPLETED",
            "invoice": {
                "id": "00000000-0000-0000-0000-000000000001",
                "number": "INV-2026-0a1b2c3d",
                "userId": "00000000-0000-0000-0000-000000000002",
                "subtotal": 49.0,
                "discount": 0.0,
                "tax": 0.0,
                "total": 49.0,
                "currency": "USD",
                "status": "PAID",
                "orderId": "ORDER-1",
                "captureId": "CAP-1",
                "payerEmail": null,
                "couponId": null,
                "createdAt": "2026-03-02T12:00:00Z"
            },
            "purchases": [],
            "needsScheduleSetup": false,
            "enrollments": []
        });
        let parsed: CaptureOrderResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.capture_id, "CAP-1");
        assert!(!parsed.needs_schedule_setup);
    }
}
