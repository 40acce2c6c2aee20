//! Catalog management queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use edge_shoes_core::{Category, Price, Shoe, ShoeDraft, ShoeId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct ShoeRow {
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

const SHOE_COLUMNS: &str = r"
    id, name, brand, category, description, price, original_price, image,
    sizes, colors, tags, rating, reviews, stock, featured, created_at, updated_at
";

async fn insert_shoe<'e>(
    executor: impl PgExecutor<'e>,
    draft: &ShoeDraft,
) -> Result<ShoeRow, sqlx::Error> {
    sqlx::query_as::<_, ShoeRow>(&format!(
        r"
        INSERT INTO shop.shoe
            (name, brand, category, description, price, original_price, image,
             sizes, colors, tags, rating, reviews, stock, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING {SHOE_COLUMNS}
        "
    ))
    .bind(&draft.name)
    .bind(&draft.brand)
    .bind(draft.category.as_str())
    .bind(&draft.description)
    .bind(draft.price)
    .bind(draft.original_price)
    .bind(&draft.image)
    .bind(&draft.sizes)
    .bind(&draft.colors)
    .bind(&draft.tags)
    .bind(draft.rating)
    .bind(draft.reviews)
    .bind(draft.stock)
    .bind(draft.featured)
    .fetch_one(executor)
    .await
}

/// Repository for catalog writes.
pub struct ShoeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShoeRepository<'a> {
    /// Create a new shoe repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every shoe, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Shoe>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShoeRow>(&format!(
            "SELECT {SHOE_COLUMNS} FROM shop.shoe ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Shoe::try_from).collect()
    }

    /// Get a shoe by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ShoeId) -> Result<Option<Shoe>, RepositoryError> {
        let row = sqlx::query_as::<_, ShoeRow>(&format!(
            "SELECT {SHOE_COLUMNS} FROM shop.shoe WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Shoe::try_from).transpose()
    }

    /// Insert a validated shoe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ShoeDraft) -> Result<Shoe, RepositoryError> {
        let shoe = Shoe::try_from(insert_shoe(self.pool, draft).await?)?;
        tracing::info!(shoe_id = %shoe.id, "Shoe created");
        Ok(shoe)
    }

    /// Insert many validated shoes in one transaction.
    ///
    /// With `clear_existing`, the catalog is emptied first; order lines keep
    /// their snapshots. Returns the number of shoes inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails. Nothing is
    /// written in that case.
    #[instrument(skip(self, drafts), fields(count = drafts.len()))]
    pub async fn insert_all(
        &self,
        drafts: &[ShoeDraft],
        clear_existing: bool,
    ) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if clear_existing {
            let removed = sqlx::query("DELETE FROM shop.shoe")
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::info!(removed, "Catalog cleared");
        }

        for draft in drafts {
            insert_shoe(&mut *tx, draft).await?;
        }

        tx.commit().await?;
        Ok(drafts.len())
    }

    /// Replace every editable field of a shoe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shoe does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: ShoeId, draft: &ShoeDraft) -> Result<Shoe, RepositoryError> {
        let row = sqlx::query_as::<_, ShoeRow>(&format!(
            r"
            UPDATE shop.shoe
            SET name = $2, brand = $3, category = $4, description = $5, price = $6,
                original_price = $7, image = $8, sizes = $9, colors = $10, tags = $11,
                rating = $12, reviews = $13, stock = $14, featured = $15,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SHOE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.brand)
        .bind(draft.category.as_str())
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.original_price)
        .bind(&draft.image)
        .bind(&draft.sizes)
        .bind(&draft.colors)
        .bind(&draft.tags)
        .bind(draft.rating)
        .bind(draft.reviews)
        .bind(draft.stock)
        .bind(draft.featured)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Shoe::try_from(row)
    }

    /// Set the stock level of a shoe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shoe does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self))]
    pub async fn set_stock(&self, id: ShoeId, stock: i32) -> Result<Shoe, RepositoryError> {
        let row = sqlx::query_as::<_, ShoeRow>(&format!(
            r"
            UPDATE shop.shoe
            SET stock = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {SHOE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(stock)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Shoe::try_from(row)
    }

    /// Delete a shoe. Order lines keep their snapshot with `shoe_id` cleared.
    ///
    /// Returns `false` if no shoe had this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ShoeId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.shoe WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
