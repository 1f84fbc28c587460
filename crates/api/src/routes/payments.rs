//! Payment capture.
//!
//! `POST /api/v1/payments/capture` runs the whole post-payment pipeline:
//! capture the order with the gateway, persist the invoice with its
//! purchases, provision enrollments, then fan out notifications. Gateway
//! rejection maps to 400, provider outage to 503.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    CaptureOrderRequest, CaptureOrderResponse, CustomerInfo, EnrollmentSummary, Invoice, Purchase,
    User,
};
use domain::services::{NotificationResult, PurchaseNotification};
use persistence::entities::InvoiceEntity;
use persistence::repositories::{
    CouponRepository, InvoiceInput, InvoiceRepository, PurchaseInput, UserRepository,
};
use shared::reference::generate_invoice_number;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OptionalSessionUser;
use crate::middleware::metrics::record_payment_captured;
use crate::services::{ProvisionOutcome, ProvisioningService};

/// Capture a gateway order and provision everything it paid for.
pub async fn capture_order(
    State(state): State<AppState>,
    OptionalSessionUser(session_user): OptionalSessionUser,
    Json(request): Json<CaptureOrderRequest>,
) -> Result<Json<CaptureOrderResponse>, ApiError> {
    let order_id = request
        .order_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("orderID is required".to_string()))?;
    let data = request
        .invoice_data
        .as_ref()
        .ok_or_else(|| ApiError::Validation("invoiceData is required".to_string()))?;
    data.validate()?;
    if let Some(info) = &request.customer_info {
        info.validate()?;
    }

    let user = resolve_buyer(&state, session_user, request.customer_info.as_ref()).await?;

    // Money moves before anything is written; a declined capture leaves
    // no trace in the database.
    let outcome = state.gateway.capture_order(order_id).await?;
    if !outcome.status.is_completed() {
        warn!(order_id, status = %outcome.status, "Capture did not complete");
        return Err(ApiError::PaymentNotCompleted(format!(
            "Payment status is {}",
            outcome.status
        )));
    }

    let invoice_input = InvoiceInput {
        number: generate_invoice_number(),
        user_id: user.id,
        subtotal: data.subtotal,
        discount: data.discount,
        tax: data.tax,
        total: data.total,
        currency: data.currency.clone().unwrap_or_else(|| "USD".to_string()),
        order_id: order_id.to_string(),
        capture_id: outcome.capture_id.clone(),
        payer_email: outcome.payer_email.clone(),
        coupon_id: data.coupon_id,
    };
    let mut items = Vec::with_capacity(data.items.len());
    for item in &data.items {
        let snapshot = item
            .selected_schedule
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::Internal(format!("Failed to snapshot schedule: {}", e)))?;
        items.push(PurchaseInput {
            product_id: item.product_id,
            plan_id: item.plan_id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity: item.quantity,
            selected_schedule: snapshot,
            prorated_classes: item.prorated_classes,
            prorated_price: item.prorated_price,
        });
    }

    let invoice_repo = InvoiceRepository::new(state.pool.clone());
    let (invoice_entity, purchase_entities) = invoice_repo
        .create_with_purchases(invoice_input, items)
        .await?;
    record_payment_captured();
    info!(
        invoice_id = %invoice_entity.id,
        invoice_number = %invoice_entity.number,
        purchases = purchase_entities.len(),
        "Captured payment and persisted invoice"
    );

    if let Some(coupon_id) = invoice_entity.coupon_id {
        credit_coupon_usage(&state, coupon_id).await;
    }

    let provisioning =
        ProvisioningService::new(state.pool.clone(), state.config.scheduling.clone());
    let results = futures::future::join_all(
        purchase_entities
            .iter()
            .map(|p| provisioning.provision_purchase(&user, p)),
    )
    .await;

    let mut enrollments = Vec::new();
    let mut needs_schedule_setup = false;
    let mut provisioning_failed = false;
    for (purchase, result) in purchase_entities.iter().zip(results) {
        match result {
            Ok(ProvisionOutcome::Enrolled {
                enrollment_id,
                course_title,
            }) => enrollments.push(EnrollmentSummary {
                id: enrollment_id,
                course_title,
            }),
            Ok(ProvisionOutcome::AwaitingSchedule) => needs_schedule_setup = true,
            Ok(ProvisionOutcome::NoPeriod) | Ok(ProvisionOutcome::NotEligible) => {}
            Err(e) => {
                error!(
                    purchase_id = %purchase.id,
                    error = %e,
                    "Provisioning failed after capture"
                );
                provisioning_failed = true;
            }
        }
    }
    // The invoice is already persisted, so the payment is not lost; the
    // 500 flags the account for manual provisioning.
    if provisioning_failed {
        return Err(ApiError::Internal(
            "Payment was captured but enrollment provisioning failed".to_string(),
        ));
    }

    let item_names: Vec<String> = purchase_entities.iter().map(|p| p.name.clone()).collect();
    send_notifications(&state, &user, &invoice_entity, &item_names).await;

    // Refetch so the response carries post-provisioning statuses.
    let final_purchases = invoice_repo.find_purchases(invoice_entity.id).await?;

    Ok(Json(CaptureOrderResponse {
        success: true,
        capture_id: outcome.capture_id,
        status: outcome.status.to_string(),
        invoice: Invoice::from(invoice_entity),
        purchases: final_purchases.into_iter().map(Purchase::from).collect(),
        needs_schedule_setup,
        enrollments,
    }))
}

/// Session user when present, otherwise find-or-create from customer info.
async fn resolve_buyer(
    state: &AppState,
    session_user: Option<User>,
    customer_info: Option<&CustomerInfo>,
) -> Result<User, ApiError> {
    if let Some(user) = session_user {
        return Ok(user);
    }

    let info = customer_info.ok_or_else(|| {
        ApiError::Validation("customerInfo is required for guest checkout".to_string())
    })?;
    let repo = UserRepository::new(state.pool.clone());
    let (entity, created) = repo
        .find_or_create_by_email(&info.email, Some(&info.first_name), info.last_name.as_deref())
        .await?;
    if created {
        info!(user_id = %entity.id, "Created guest account for checkout");
    }
    Ok(User::from(entity))
}

/// Best effort; a miscounted coupon must not fail a captured payment.
async fn credit_coupon_usage(state: &AppState, coupon_id: Uuid) {
    let repo = CouponRepository::new(state.pool.clone());
    match repo.increment_usage(coupon_id).await {
        Ok(true) => {}
        Ok(false) => warn!(%coupon_id, "Invoice references unknown coupon"),
        Err(e) => warn!(%coupon_id, error = %e, "Failed to record coupon usage"),
    }
}

/// Emails go out on a detached task; the platform notification is awaited
/// so tests can observe the row, but failures only log.
async fn send_notifications(
    state: &AppState,
    user: &User,
    invoice: &InvoiceEntity,
    item_names: &[String],
) {
    let email = state.email.clone();
    let to = user.email.clone();
    let to_name = user.first_name.clone();
    let number = invoice.number.clone();
    let total = invoice.total;
    let currency = invoice.currency.clone();
    let names = item_names.to_vec();
    tokio::spawn(async move {
        if let Err(e) = email
            .send_payment_confirmation(&to, to_name.as_deref(), &number, total, &currency, &names)
            .await
        {
            warn!(invoice_number = %number, error = %e, "Failed to send confirmation email");
        }
        if let Err(e) = email
            .send_admin_purchase_alert(&number, &to, total, &currency, &names)
            .await
        {
            warn!(invoice_number = %number, error = %e, "Failed to send admin alert");
        }
    });

    let notification = PurchaseNotification {
        user_id: Some(user.id),
        invoice_id: invoice.id,
        invoice_number: invoice.number.clone(),
        total: invoice.total,
        currency: invoice.currency.clone(),
        item_names: item_names.to_vec(),
        timestamp: Utc::now(),
    };
    if let NotificationResult::Failed(reason) =
        state.notifier.notify_new_purchase(notification).await
    {
        warn!(invoice_id = %invoice.id, reason, "Purchase notification not recorded");
    }
}
