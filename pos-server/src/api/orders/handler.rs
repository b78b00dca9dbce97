//! Order API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus, OrderUpdate};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<usize>,
}

/// List orders, newest first, optionally filtered by status
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_all(query.status, query.limit).await?;
    Ok(Json(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// Create a new order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    if payload.items.is_empty() {
        return Err(AppError::validation("Order must have at least one item"));
    }

    let repo = OrderRepository::new(state.get_db());
    let order = repo.create(payload).await?;
    tracing::info!(order = ?order.id, "Order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// Update an order
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.update(&id, payload).await?;
    Ok(Json(order))
}

/// Delete an order (rejected once invoiced)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = OrderRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    tracing::info!(order = %id, "Order deleted");
    Ok(Json(result))
}
