//! In-memory catalog cache.
//!
//! The whole catalog is loaded with one query and kept in a `moka` cache for
//! `CATALOG_CACHE_TTL_SECS`. Listing, highlights, facets and the session
//! lists all read from the cached snapshot. Placing an order changes stock,
//! so the cache is invalidated afterwards.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use edge_shoes_core::{Shoe, ShoeId};

use crate::db::{RepositoryError, ShoeRepository};

/// Cached catalog snapshot.
#[derive(Clone)]
pub struct CatalogCache {
    cache: Cache<(), Arc<Vec<Shoe>>>,
}

impl CatalogCache {
    /// Create a cache whose snapshot expires after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { cache }
    }

    /// The current catalog, loading it from the database on a miss.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the catalog cannot be loaded.
    pub async fn shoes(&self, pool: &PgPool) -> Result<Arc<Vec<Shoe>>, RepositoryError> {
        if let Some(shoes) = self.cache.get(&()).await {
            debug!("Cache hit for catalog");
            return Ok(shoes);
        }

        let shoes = Arc::new(ShoeRepository::new(pool).list_all().await?);
        debug!(count = shoes.len(), "Catalog loaded");
        self.cache.insert((), Arc::clone(&shoes)).await;
        Ok(shoes)
    }

    /// Find one shoe, reading the database when the snapshot lacks it.
    ///
    /// Admin writes do not reach this cache, so a shoe created after the
    /// snapshot was taken is still found.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the catalog or the shoe cannot be loaded.
    pub async fn find(&self, pool: &PgPool, id: ShoeId) -> Result<Option<Shoe>, RepositoryError> {
        let shoes = self.shoes(pool).await?;
        if let Some(shoe) = shoes.iter().find(|s| s.id == id) {
            return Ok(Some(shoe.clone()));
        }

        debug!(shoe_id = %id, "Shoe not in cached catalog, reading database");
        ShoeRepository::new(pool).get(id).await
    }

    /// Drop the cached snapshot so the next read reloads it.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }

    /// Replace the snapshot without touching the database.
    #[cfg(test)]
    pub(crate) async fn prime(&self, shoes: Vec<Shoe>) {
        self.cache.insert((), Arc::new(shoes)).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::postgres::PgPoolOptions;

    use edge_shoes_core::{Category, Price};

    use super::*;

    fn shoe(id: i32) -> Shoe {
        let now = Utc::now();
        Shoe {
            id: ShoeId::new(id),
            name: format!("Gazelle {id}"),
            brand: "Adidas".to_string(),
            category: Category::Casual,
            description: String::new(),
            price: Price::parse("100").unwrap(),
            original_price: None,
            image: "/uploads/gazelle.jpg".to_string(),
            sizes: Vec::new(),
            colors: Vec::new(),
            tags: Vec::new(),
            rating: Decimal::ZERO,
            reviews: 0,
            stock: 10,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Pool whose database refuses every connection.
    fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://shop@127.0.0.1:1/shop")
            .unwrap()
    }

    #[tokio::test]
    async fn test_find_serves_cached_shoe() {
        let catalog = CatalogCache::new(Duration::from_secs(60));
        catalog.prime(vec![shoe(1)]).await;

        let found = catalog.find(&unreachable_pool(), ShoeId::new(1)).await.unwrap();
        assert_eq!(found.map(|s| s.name), Some("Gazelle 1".to_string()));
    }

    #[tokio::test]
    async fn test_find_reads_database_for_shoe_missing_from_snapshot() {
        let catalog = CatalogCache::new(Duration::from_secs(60));
        catalog.prime(vec![shoe(1)]).await;

        let result = catalog.find(&unreachable_pool(), ShoeId::new(2)).await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn test_invalidate_clears_snapshot() {
        let catalog = CatalogCache::new(Duration::from_secs(60));
        catalog.cache.insert((), Arc::new(Vec::new())).await;
        assert!(catalog.cache.get(&()).await.is_some());

        catalog.invalidate().await;
        assert!(catalog.cache.get(&()).await.is_none());
    }
}
