//! Database operations for the storefront.
//!
//! # Schema: `shop`
//!
//! ## Tables
//!
//! - `shoe` - Catalog (read-only from the storefront)
//! - `customer_order` - Placed orders
//! - `order_item` - Order lines with name/brand/price snapshots
//! - `session` - Tower-sessions storage (cart, wishlist, compare, recently viewed)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p edge-shoes-cli -- migrate
//! ```

pub mod orders;
pub mod shoes;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use shoes::ShoeRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// An order line asks for a size or color the shoe does not offer.
    #[error(transparent)]
    Unavailable(#[from] edge_shoes_core::UnavailableOption),

    /// The order total exceeds what the order table can store.
    #[error("order total is too large")]
    TotalTooLarge,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
