//! Read access to the shoe catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use edge_shoes_core::{Category, Price, Shoe, ShoeId};

use super::RepositoryError;

/// Raw `shop.shoe` row.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ShoeRow {
    id: ShoeId,
    name: String,
    brand: String,
    category: String,
    description: String,
    price: Price,
    original_price: Option<Price>,
    image: String,
    sizes: Vec<String>,
    colors: Vec<String>,
    tags: Vec<String>,
    rating: Decimal,
    reviews: i32,
    stock: i32,
    featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShoeRow> for Shoe {
    type Error = RepositoryError;

    fn try_from(row: ShoeRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<Category>().map_err(|e| {
            RepositoryError::DataCorruption(format!("shoe {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            brand: row.brand,
            category,
            description: row.description,
            price: row.price,
            original_price: row.original_price,
            image: row.image,
            sizes: row.sizes,
            colors: row.colors,
            tags: row.tags,
            rating: row.rating,
            reviews: row.reviews,
            stock: row.stock,
            featured: row.featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_SHOE: &str = r"
    SELECT id, name, brand, category, description, price, original_price, image,
           sizes, colors, tags, rating, reviews, stock, featured, created_at, updated_at
    FROM shop.shoe
";

/// Repository for catalog reads.
pub struct ShoeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShoeRepository<'a> {
    /// Create a new shoe repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every shoe in the catalog, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row holds an unknown category.
    pub async fn list_all(&self) -> Result<Vec<Shoe>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShoeRow>(&format!("{SELECT_SHOE} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Shoe::try_from).collect()
    }

    /// Get a shoe by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row holds an unknown category.
    pub async fn get(&self, id: ShoeId) -> Result<Option<Shoe>, RepositoryError> {
        let row = sqlx::query_as::<_, ShoeRow>(&format!("{SELECT_SHOE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Shoe::try_from).transpose()
    }
}
