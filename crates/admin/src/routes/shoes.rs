//! Catalog management route handlers.
//!
//! ```text
//! GET    /api/shoes              - All shoes
//! POST   /api/shoes              - Create
//! GET    /api/shoes/{id}         - Detail
//! PUT    /api/shoes/{id}         - Replace
//! DELETE /api/shoes/{id}         - Delete
//! PATCH  /api/shoes/{id}/stock   - Set stock level
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use edge_shoes_core::{Shoe, ShoeId, ShoeInput};

use crate::db::ShoeRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Shoe listing response.
#[derive(Debug, Serialize)]
pub struct ShoeList {
    pub shoes: Vec<Shoe>,
}

/// Stock update body.
#[derive(Debug, Deserialize)]
pub struct StockUpdate {
    pub stock: i32,
}

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/shoes", get(list).post(create))
        .route("/api/shoes/{id}", get(show).put(update).delete(remove))
        .route("/api/shoes/{id}/stock", patch(set_stock))
}

async fn list(_: RequireAdminAuth, State(state): State<AppState>) -> Result<Json<ShoeList>> {
    let shoes = ShoeRepository::new(state.pool()).list_all().await?;
    Ok(Json(ShoeList { shoes }))
}

async fn show(
    _: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ShoeId>,
) -> Result<Json<Shoe>> {
    ShoeRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Shoe".to_string()))
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<ShoeInput>,
) -> Result<(StatusCode, Json<Shoe>)> {
    let draft = input.validate()?;
    let shoe = ShoeRepository::new(state.pool()).create(&draft).await?;
    Ok((StatusCode::CREATED, Json(shoe)))
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ShoeId>,
    Json(input): Json<ShoeInput>,
) -> Result<Json<Shoe>> {
    let draft = input.validate()?;
    let shoe = ShoeRepository::new(state.pool())
        .update(id, &draft)
        .await
        .map_err(not_found_as_shoe)?;
    tracing::info!(shoe_id = %shoe.id, "Shoe updated");
    Ok(Json(shoe))
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn remove(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ShoeId>,
) -> Result<StatusCode> {
    if !ShoeRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound("Shoe".to_string()));
    }
    tracing::info!(shoe_id = %id, "Shoe deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn set_stock(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ShoeId>,
    Json(body): Json<StockUpdate>,
) -> Result<Json<Shoe>> {
    if body.stock < 0 {
        return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
    }
    let shoe = ShoeRepository::new(state.pool())
        .set_stock(id, body.stock)
        .await
        .map_err(not_found_as_shoe)?;
    Ok(Json(shoe))
}

fn not_found_as_shoe(err: crate::db::RepositoryError) -> AppError {
    match err {
        crate::db::RepositoryError::NotFound => AppError::NotFound("Shoe".to_string()),
        other => other.into(),
    }
}
