//! Order administration route handlers.
//!
//! ```text
//! GET   /api/orders               ?status&limit&offset
//! GET   /api/orders/{id}
//! PATCH /api/orders/{id}/status   {status}
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use edge_shoes_core::{Order, OrderId, OrderStatus};

use crate::db::orders::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::db::{OrderFilter, OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Raw listing query.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl OrderListParams {
    /// Validate the status and clamp paging into range.
    fn into_filter(self) -> Result<OrderFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("" | "all") => None,
            Some(raw) => Some(parse_status(raw)?),
        };

        Ok(OrderFilter {
            status,
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: self.offset.unwrap_or(0).max(0),
        })
    }
}

/// Order listing response.
#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub limit: i64,
    pub offset: i64,
}

/// Status change body.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

fn parse_status(raw: &str) -> Result<OrderStatus> {
    raw.parse::<OrderStatus>()
        .map_err(|_| AppError::BadRequest(format!("Unknown order status: {raw}")))
}

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list))
        .route("/api/orders/{id}", get(show))
        .route("/api/orders/{id}/status", patch(update_status))
}

async fn list(
    _: RequireAdminAuth,
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<OrderList>> {
    let filter = params.into_filter()?;
    let orders = OrderRepository::new(state.pool()).list(filter).await?;

    Ok(Json(OrderList {
        orders,
        limit: filter.limit,
        offset: filter.offset,
    }))
}

async fn show(
    _: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    OrderRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order".to_string()))
}

#[instrument(skip_all, fields(admin_id = %admin.id, order_id = %id))]
async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    let next = parse_status(&body.status)?;

    let order = OrderRepository::new(state.pool())
        .update_status(id, next)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Order".to_string()),
            other => other.into(),
        })?;

    Ok(Json(order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let filter = OrderListParams::default().into_filter().unwrap();
        assert_eq!(filter, OrderFilter::default());
    }

    #[test]
    fn test_filter_clamps_paging() {
        let filter = OrderListParams {
            status: Some("Shipped".to_string()),
            limit: Some(1_000),
            offset: Some(-5),
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.status, Some(OrderStatus::Shipped));
        assert_eq!(filter.limit, MAX_PAGE_SIZE);
        assert_eq!(filter.offset, 0);

        let filter = OrderListParams {
            limit: Some(0),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.limit, 1);
    }

    #[test]
    fn test_filter_all_means_no_status() {
        let filter = OrderListParams {
            status: Some("all".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.status, None);
    }

    #[test]
    fn test_unknown_status_is_bad_request() {
        let err = OrderListParams {
            status: Some("lost".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(matches!(parse_status("teleported"), Err(AppError::BadRequest(_))));
    }
}
