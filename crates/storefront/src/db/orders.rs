//! Order placement and lookup.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use edge_shoes_core::{
    Email, Order, OrderId, OrderItem, OrderItemId, OrderStatus, Price, ShoeId, ValidNewOrder,
    check_options,
};

use super::RepositoryError;

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
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", self.id))
        })?;

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

/// Catalog values copied onto each order line.
#[derive(Debug, sqlx::FromRow)]
struct ShoeSnapshot {
    id: ShoeId,
    name: String,
    brand: String,
    price: Price,
    sizes: Vec<String>,
    colors: Vec<String>,
}

/// A line priced against the catalog, ready to insert.
struct PricedLine<'o> {
    snapshot: &'o ShoeSnapshot,
    size: &'o str,
    color: &'o str,
    quantity: i32,
    line_total: Price,
    stock_reserved: bool,
}

/// SQLSTATE for `numeric_value_out_of_range`.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

fn is_numeric_overflow(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == NUMERIC_OUT_OF_RANGE)
}

const ORDER_COLUMNS: &str = r"
    id, customer_name, customer_email, customer_phone, shipping_address,
    status, total, item_count, created_at, updated_at
";

const ITEM_COLUMNS: &str = r"
    id, order_id, shoe_id, name, brand, size, color, quantity,
    unit_price, line_total, stock_reserved
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order.
    ///
    /// Runs in a single transaction. The referenced shoes are locked and each
    /// line is checked and priced against the locked rows. Stock is then
    /// decremented for every line that has enough of it, and the order and its
    /// lines are inserted. Lines without enough stock are kept with
    /// `stock_reserved = false`. Any failure rolls back every write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if any referenced shoe does not exist.
    /// Returns `RepositoryError::Unavailable` if a size or color is not offered.
    /// Returns `RepositoryError::TotalTooLarge` if the order total does not fit.
    /// Returns `RepositoryError::Database` if a statement fails.
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    pub async fn create(&self, order: &ValidNewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut shoe_ids: Vec<ShoeId> = order.items.iter().map(|line| line.shoe_id).collect();
        shoe_ids.sort_unstable();
        shoe_ids.dedup();
        let raw_ids: Vec<i32> = shoe_ids.iter().map(ShoeId::as_i32).collect();

        let snapshots = sqlx::query_as::<_, ShoeSnapshot>(
            r"
            SELECT id, name, brand, price, sizes, colors
            FROM shop.shoe
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            ",
        )
        .bind(&raw_ids)
        .fetch_all(&mut *tx)
        .await?;

        if snapshots.len() != shoe_ids.len() {
            tracing::warn!(
                requested = shoe_ids.len(),
                found = snapshots.len(),
                "Order references unknown shoes"
            );
            return Err(RepositoryError::NotFound);
        }

        let mut lines = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let snapshot = snapshots
                .iter()
                .find(|s| s.id == item.shoe_id)
                .ok_or(RepositoryError::NotFound)?;
            check_options(
                &snapshot.name,
                &snapshot.sizes,
                &snapshot.colors,
                &item.size,
                &item.color,
            )?;
            let quantity = u32::try_from(item.quantity).map_err(|_| {
                RepositoryError::DataCorruption(format!("negative quantity {}", item.quantity))
            })?;
            let line_total = snapshot.price.line_total(quantity).ok_or_else(|| {
                RepositoryError::DataCorruption(format!("line total overflow for shoe {}", item.shoe_id))
            })?;
            lines.push(PricedLine {
                snapshot,
                size: &item.size,
                color: &item.color,
                quantity: item.quantity,
                line_total,
                stock_reserved: false,
            });
        }

        for line in &mut lines {
            line.stock_reserved = reserve_stock(&mut tx, line.snapshot.id, line.quantity).await?;
            if !line.stock_reserved {
                tracing::warn!(
                    shoe_id = %line.snapshot.id,
                    quantity = line.quantity,
                    "Insufficient stock, line left unreserved"
                );
            }
        }

        let total: Price = lines.iter().map(|l| l.line_total).sum();
        let item_count: i32 = lines.iter().map(|l| l.quantity).sum();
        let customer = &order.customer;

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO shop.customer_order
                (customer_name, customer_email, customer_phone, shipping_address,
                 status, total, item_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.phone.as_deref())
        .bind(&customer.address)
        .bind(OrderStatus::Pending.as_str())
        .bind(total)
        .bind(item_count)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_numeric_overflow(&e) {
                tracing::warn!(total = %total, "Order total out of range");
                RepositoryError::TotalTooLarge
            } else {
                RepositoryError::Database(e)
            }
        })?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = sqlx::query_as::<_, OrderItemRow>(&format!(
                r"
                INSERT INTO shop.order_item
                    (order_id, shoe_id, name, brand, size, color, quantity,
                     unit_price, line_total, stock_reserved)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING {ITEM_COLUMNS}
                "
            ))
            .bind(order_row.id)
            .bind(line.snapshot.id)
            .bind(&line.snapshot.name)
            .bind(&line.snapshot.brand)
            .bind(line.size)
            .bind(line.color)
            .bind(line.quantity)
            .bind(line.snapshot.price)
            .bind(line.line_total)
            .bind(line.stock_reserved)
            .fetch_one(&mut *tx)
            .await?;
            items.push(OrderItem::from(item));
        }

        tx.commit().await?;

        tracing::info!(order_id = %order_row.id, total = %total, item_count, "Order placed");
        order_row.into_order(items)
    }

    /// Get an order and its lines by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
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

        let items = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM shop.order_item WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

        row.into_order(items).map(Some)
    }
}

/// Decrement stock when enough is available. Returns whether a row changed.
async fn reserve_stock(
    conn: &mut PgConnection,
    shoe_id: ShoeId,
    quantity: i32,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE shop.shoe
        SET stock = stock - $2, updated_at = NOW()
        WHERE id = $1 AND stock >= $2
        ",
    )
    .bind(shoe_id)
    .bind(quantity)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
