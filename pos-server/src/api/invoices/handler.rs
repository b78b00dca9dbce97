//! Invoice API handlers
//!
//! Precondition checks and the atomic write live in the invoicing
//! workflow; handlers only translate HTTP.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Invoice, InvoiceCreate, InvoiceFilter, InvoiceStatus, Order, UserPublic};
use crate::db::repository::{InvoiceRepository, OrderRepository, UserRepository};
use crate::utils::{AppError, AppResult, time};

/// Query parameters for the invoice list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub customer_nit: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceCreated {
    pub invoice: Invoice,
    pub order: Order,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// Issue an invoice for an order
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<(StatusCode, Json<InvoiceCreated>)> {
    let issuer = state.invoice_issuer();
    let (invoice, order) = issuer.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(InvoiceCreated { invoice, order })))
}

/// List invoices with optional filters, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<InvoiceListQuery>,
) -> AppResult<Json<Vec<Invoice>>> {
    let start_date = query
        .start_date
        .as_deref()
        .map(time::parse_date_param)
        .transpose()?;
    let end_date = query
        .end_date
        .as_deref()
        .map(time::parse_end_date_param)
        .transpose()?;

    let repo = InvoiceRepository::new(state.get_db());
    let invoices = repo
        .find_filtered(InvoiceFilter {
            start_date,
            end_date,
            customer_nit: query.customer_nit,
            status: query.status,
            limit: query.limit,
        })
        .await?;
    Ok(Json(invoices))
}

/// Get invoice by id, with the order, processing user and registered
/// customer references resolved into full documents
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = InvoiceRepository::new(state.get_db());
    let invoice = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))?;

    let mut body = serde_json::to_value(&invoice)
        .map_err(|e| AppError::internal(format!("Failed to serialize invoice: {}", e)))?;

    let orders = OrderRepository::new(state.get_db());
    if let Some(order) = orders.find_by_id(&invoice.order.to_string()).await? {
        body["order"] = serde_json::to_value(&order)
            .map_err(|e| AppError::internal(format!("Failed to serialize order: {}", e)))?;
    }

    let users = UserRepository::new(state.get_db());
    if let Some(user) = users.find_by_id(&invoice.processed_by.to_string()).await? {
        body["processedBy"] = serde_json::to_value(UserPublic::from(user))
            .map_err(|e| AppError::internal(format!("Failed to serialize user: {}", e)))?;
    }

    if let Some(ref customer_ref) = invoice.customer.user
        && let Some(user) = users.find_by_id(&customer_ref.to_string()).await?
    {
        body["customer"]["user"] = serde_json::to_value(UserPublic::from(user))
            .map_err(|e| AppError::internal(format!("Failed to serialize user: {}", e)))?;
    }

    Ok(Json(body))
}

/// Void an invoice, administrators only
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Option<Json<CancelRequest>>,
) -> AppResult<Json<Invoice>> {
    let reason = payload.and_then(|Json(p)| p.reason);
    let issuer = state.invoice_issuer();
    let invoice = issuer.cancel(&user, &id, reason).await?;
    Ok(Json(invoice))
}

/// All invoices issued to a registered customer, newest first
pub async fn list_by_customer(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
) -> AppResult<Json<Vec<Invoice>>> {
    let user_ref: surrealdb::RecordId = customer_id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid customer ID: {}", customer_id)))?;

    let repo = InvoiceRepository::new(state.get_db());
    let invoices = repo.find_by_customer(&user_ref).await?;
    Ok(Json(invoices))
}
