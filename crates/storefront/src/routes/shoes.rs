//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use edge_shoes_core::catalog::{self, Facets, Highlights};
use edge_shoes_core::{CatalogQuery, Price, RecentlyViewed, Shoe, ShoeId, SortOrder};

use crate::error::{AppError, Result};
use crate::models::session::{self, keys};
use crate::state::AppState;

/// Query string for `GET /api/shoes`.
///
/// Prices and the sort order arrive as raw strings so that bad values
/// produce a JSON error instead of the default query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ShoeListParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Comma-separated sizes, e.g. `8,9.5`.
    pub sizes: Option<String>,
    pub sort: Option<String>,
}

impl ShoeListParams {
    fn into_query(self) -> Result<CatalogQuery> {
        let min_price = parse_price("min_price", self.min_price.as_deref())?;
        let max_price = parse_price("max_price", self.max_price.as_deref())?;
        if let (Some(min), Some(max)) = (min_price, max_price)
            && min > max
        {
            return Err(AppError::BadRequest(
                "min_price cannot be greater than max_price".to_string(),
            ));
        }

        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()
            .map_err(AppError::BadRequest)?
            .unwrap_or_default();

        let sizes = self
            .sizes
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(CatalogQuery {
            search: self.q,
            category: self.category,
            brand: self.brand,
            min_price,
            max_price,
            sizes,
            sort,
        })
    }
}

fn parse_price(name: &str, raw: Option<&str>) -> Result<Option<Price>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => Price::parse(value)
            .map(Some)
            .map_err(|e| AppError::BadRequest(format!("{name}: {e}"))),
    }
}

/// Catalog listing response.
#[derive(Debug, Serialize)]
pub struct ShoeList {
    pub shoes: Vec<Shoe>,
    pub count: usize,
}

/// List shoes matching the query string.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ShoeListParams>,
) -> Result<Json<ShoeList>> {
    let query = params.into_query()?;
    let catalog = state.catalog().shoes(state.pool()).await?;
    let shoes = catalog::filter_and_sort(&catalog, &query);

    Ok(Json(ShoeList {
        count: shoes.len(),
        shoes,
    }))
}

/// Home page strips: featured, new arrivals, best sellers and gallery.
pub async fn highlights(State(state): State<AppState>) -> Result<Json<Highlights>> {
    let catalog = state.catalog().shoes(state.pool()).await?;
    Ok(Json(catalog::highlights(&catalog)))
}

/// Category and brand filter options with counts.
pub async fn facets(State(state): State<AppState>) -> Result<Json<Facets>> {
    let catalog = state.catalog().shoes(state.pool()).await?;
    Ok(Json(catalog::facets(&catalog)))
}

/// Shoe detail. Also records the shoe as recently viewed.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ShoeId>,
) -> Result<Json<Shoe>> {
    let shoe = state
        .catalog()
        .find(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shoe".to_string()))?;

    let mut recent: RecentlyViewed = session::load(&session, keys::RECENTLY_VIEWED).await?;
    recent.track(shoe.id);
    session::store(&session, keys::RECENTLY_VIEWED, &recent).await?;

    Ok(Json(shoe))
}
