//! Invoice lookup.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use domain::models::{Invoice, Purchase};
use persistence::repositories::InvoiceRepository;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub invoice: Invoice,
    pub purchases: Vec<Purchase>,
}

/// Fetch an invoice with its purchase lines.
///
/// Served without authentication: the id is an unguessable UUID handed to
/// the buyer on the confirmation page, and guests have no session to
/// present.
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let repo = InvoiceRepository::new(state.pool.clone());
    let invoice = repo
        .find_by_id(invoice_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".to_string()))?;
    let purchases = repo.find_purchases(invoice.id).await?;

    Ok(Json(InvoiceResponse {
        invoice: Invoice::from(invoice),
        purchases: purchases.into_iter().map(Purchase::from).collect(),
    }))
}
