//! Late schedule selection for purchases captured without one.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{EnrollmentSummary, Plan, Purchase, SelectScheduleRequest, User};
use persistence::repositories::{
    CourseRepository, InvoiceRepository, PurchaseRepository, UserRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::{ProvisionOutcome, ProvisioningService};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectScheduleResponse {
    pub success: bool,
    pub purchase: Purchase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<EnrollmentSummary>,
}

/// Attach a weekly schedule to a CONFIRMED purchase and provision it.
pub async fn select_schedule(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    Json(request): Json<SelectScheduleRequest>,
) -> Result<Json<SelectScheduleResponse>, ApiError> {
    request.validate()?;

    let purchase_repo = PurchaseRepository::new(state.pool.clone());
    let purchase = purchase_repo
        .find_by_id(purchase_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Purchase not found".to_string()))?;
    if purchase.status == "ENROLLED" {
        return Err(ApiError::Conflict(
            "Purchase is already enrolled".to_string(),
        ));
    }

    let plan_id = purchase.plan_id.ok_or_else(|| {
        ApiError::Validation("Purchase is not class-inclusive".to_string())
    })?;
    let course_repo = CourseRepository::new(state.pool.clone());
    let plan_entity = course_repo.find_plan_by_id(plan_id).await?.ok_or_else(|| {
        ApiError::Validation("Purchase is not class-inclusive".to_string())
    })?;
    if !Plan::from(plan_entity).is_enrollable() {
        return Err(ApiError::Validation(
            "Purchase is not class-inclusive".to_string(),
        ));
    }

    let invoice = InvoiceRepository::new(state.pool.clone())
        .find_by_id(purchase.invoice_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Purchase has no invoice".to_string()))?;
    let buyer = UserRepository::new(state.pool.clone())
        .find_by_id(invoice.user_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Invoice has no user".to_string()))?;
    let buyer = User::from(buyer);

    let snapshot = serde_json::to_value(&request.selected_schedule)
        .map_err(|e| ApiError::Internal(format!("Failed to snapshot schedule: {}", e)))?;
    // The UPDATE is gated on CONFIRMED, so a concurrent enrollment of the
    // same purchase loses here instead of double-provisioning.
    let updated = purchase_repo
        .set_selected_schedule(purchase.id, snapshot)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Purchase is not awaiting schedule selection".to_string())
        })?;
    info!(purchase_id = %updated.id, slots = request.selected_schedule.len(), "Schedule selected");

    let provisioning =
        ProvisioningService::new(state.pool.clone(), state.config.scheduling.clone());
    let outcome = provisioning.provision_purchase(&buyer, &updated).await?;

    let enrollment = match outcome {
        ProvisionOutcome::Enrolled {
            enrollment_id,
            course_title,
        } => Some(EnrollmentSummary {
            id: enrollment_id,
            course_title,
        }),
        _ => None,
    };

    let purchase = purchase_repo
        .find_by_id(purchase_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Purchase vanished mid-request".to_string()))?;

    Ok(Json(SelectScheduleResponse {
        success: true,
        purchase: Purchase::from(purchase),
        enrollment,
    }))
}
