//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use edge_shoes_core::{NewOrder, Order, OrderId, Shoe};

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Check that a requested size and color are offered by `shoe`.
///
/// # Errors
///
/// Returns `AppError::BadRequest` naming the first unavailable option.
pub fn ensure_available(shoe: &Shoe, size: &str, color: &str) -> Result<()> {
    shoe.check_options(size, color)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Validate and place an order, then refresh the catalog.
///
/// Shared by `POST /api/orders` and cart checkout. Shoes, options and prices
/// are read from the rows the order transaction locks, not from the catalog
/// cache.
///
/// # Errors
///
/// Returns `AppError::InvalidOrder` for payload errors, `AppError::NotFound`
/// for unknown shoes, and a client error for unavailable options or an
/// oversized total.
pub async fn place_order(state: &AppState, new_order: &NewOrder) -> Result<Order> {
    let order = new_order.validate()?;

    let placed = OrderRepository::new(state.pool())
        .create(&order)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Shoe".to_string()),
            other => AppError::Database(other),
        })?;
    state.catalog().invalidate().await;

    add_breadcrumb(
        "order",
        "Order placed",
        Some(&[("order_id", &placed.id.to_string())]),
    );
    Ok(placed)
}

/// Place an order from an explicit list of lines.
#[instrument(skip(state, new_order), fields(lines = new_order.items.len()))]
pub async fn create(
    State(state): State<AppState>,
    Json(new_order): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = place_order(&state, &new_order).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Order detail.
pub async fn show(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<Json<Order>> {
    OrderRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order".to_string()))
}
