//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tower_sessions::Session;

use edge_shoes_core::catalog::resolve_ids;
use edge_shoes_core::{Shoe, ShoeId, Wishlist};

use crate::error::{AppError, Result};
use crate::models::session::{self, keys};
use crate::state::AppState;

/// Wishlist response: saved IDs plus the shoes still in the catalog.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub ids: Vec<ShoeId>,
    pub shoes: Vec<Shoe>,
}

/// Result of toggling a wishlist entry.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub saved: bool,
    pub ids: Vec<ShoeId>,
}

/// Saved shoes, most recent first.
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<WishlistView>> {
    let wishlist: Wishlist = session::load(&session, keys::WISHLIST).await?;
    let catalog = state.catalog().shoes(state.pool()).await?;

    Ok(Json(WishlistView {
        ids: wishlist.ids().to_vec(),
        shoes: resolve_ids(&catalog, wishlist.ids(), usize::MAX),
    }))
}

/// Save a shoe, or unsave it if already saved.
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ShoeId>,
) -> Result<Json<ToggleResponse>> {
    let mut wishlist: Wishlist = session::load(&session, keys::WISHLIST).await?;

    // Unknown shoes can still be removed, only adding needs the catalog
    if !wishlist.contains(id) && state.catalog().find(state.pool(), id).await?.is_none() {
        return Err(AppError::NotFound("Shoe".to_string()));
    }

    let saved = wishlist.toggle(id);
    session::store(&session, keys::WISHLIST, &wishlist).await?;

    Ok(Json(ToggleResponse {
        saved,
        ids: wishlist.ids().to_vec(),
    }))
}

/// Remove every saved shoe.
pub async fn clear(session: Session) -> Result<StatusCode> {
    session::store(&session, keys::WISHLIST, &Wishlist::default()).await?;
    Ok(StatusCode::NO_CONTENT)
}
