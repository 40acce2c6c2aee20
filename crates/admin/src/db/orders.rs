//! Order listing and fulfilment status changes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use edge_shoes_core::{Email, Order, OrderId, OrderItem, OrderItemId, OrderStatus, Price, ShoeId};

use super::RepositoryError;

/// Largest page the order listing returns.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size for the order listing.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Filter and page for the order listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_name: String,
    customer_email: Email,
    customer_phone: Option<String>,
    shipping_address: String,
    status: String,
    total: Price,
    item_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status = parse_status(self.id, &self.status)?;

        Ok(Order {
            id: self.id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            shipping_address: self.shipping_address,
            status,
            total: self.total,
            item_count: self.item_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    shoe_id: Option<ShoeId>,
    name: String,
    brand: String,
    size: String,
    color: String,
    quantity: i32,
    unit_price: Price,
    line_total: Price,
    stock_reserved: bool,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            shoe_id: row.shoe_id,
            name: row.name,
            brand: row.brand,
            size: row.size,
            color: row.color,
            quantity: row.quantity,
            unit_price: row.unit_price,
            line_total: row.line_total,
            stock_reserved: row.stock_reserved,
        }
    }
}

fn parse_status(id: OrderId, raw: &str) -> Result<OrderStatus, RepositoryError> {
    raw.parse::<OrderStatus>()
        .map_err(|e| RepositoryError::DataCorruption(format!("order {id}: {e}")))
}

const ORDER_COLUMNS: &str = r"
    id, customer_name, customer_email, customer_phone, shipping_address,
    status, total, item_count, created_at, updated_at
";

const ITEM_COLUMNS: &str = r"
    id, order_id, shoe_id, name, brand, size, color, quantity,
    unit_price, line_total, stock_reserved
";

/// Repository for order administration.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Orders newest first, with their lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is unknown.
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM shop.customer_order
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM shop.order_item WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in item_rows {
            by_order.entry(item.order_id).or_default().push(item.into());
        }

        rows.into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }

    /// Get an order and its lines by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored status is unknown.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.items(id).await?;
        row.into_order(items).map(Some)
    }

    async fn items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM shop.order_item WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Move an order to `next`.
    ///
    /// Cancelling returns the reserved stock of every line to the catalog in
    /// the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Conflict` if the transition is not allowed.
    /// Returns `RepositoryError::Database` if a statement fails.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: OrderId,
        next: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: String =
            sqlx::query_scalar("SELECT status FROM shop.customer_order WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;
        let current = parse_status(id, &current)?;

        if !current.can_transition_to(next) {
            return Err(RepositoryError::Conflict(format!(
                "Cannot change order status from {current} to {next}"
            )));
        }

        if next == OrderStatus::Cancelled {
            // Several lines may share a shoe, so quantities are summed per shoe
            let restored = sqlx::query(
                r"
                UPDATE shop.shoe AS s
                SET stock = s.stock + r.quantity, updated_at = NOW()
                FROM (
                    SELECT shoe_id, SUM(quantity)::INTEGER AS quantity
                    FROM shop.order_item
                    WHERE order_id = $1 AND stock_reserved AND shoe_id IS NOT NULL
                    GROUP BY shoe_id
                ) AS r
                WHERE s.id = r.shoe_id
                ",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            sqlx::query(
                "UPDATE shop.order_item SET stock_reserved = FALSE WHERE order_id = $1",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;

            tracing::info!(order_id = %id, restored, "Stock restored for cancelled order");
        }

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            UPDATE shop.customer_order
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(next.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(order_id = %id, from = %current, to = %next, "Order status changed");
        let items = self.items(id).await?;
        row.into_order(items)
    }
}
