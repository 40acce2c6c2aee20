//! Compare list route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tower_sessions::Session;

use edge_shoes_core::catalog::resolve_ids;
use edge_shoes_core::{CompareList, CompareToggle, Shoe, ShoeId};

use crate::error::{AppError, Result};
use crate::models::session::{self, keys};
use crate::state::AppState;

/// Compare list response.
#[derive(Debug, Serialize)]
pub struct CompareView {
    pub ids: Vec<ShoeId>,
    pub shoes: Vec<Shoe>,
    pub max: usize,
}

/// Result of toggling a compare entry.
#[derive(Debug, Serialize)]
pub struct CompareToggleResponse {
    pub result: CompareToggle,
    pub ids: Vec<ShoeId>,
}

/// Shoes being compared, in the order they were added.
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CompareView>> {
    let compare: CompareList = session::load(&session, keys::COMPARE).await?;
    let catalog = state.catalog().shoes(state.pool()).await?;

    Ok(Json(CompareView {
        ids: compare.ids().to_vec(),
        shoes: resolve_ids(&catalog, compare.ids(), CompareList::MAX),
        max: CompareList::MAX,
    }))
}

/// Add a shoe to the compare list or remove it. A full list is left unchanged.
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ShoeId>,
) -> Result<Json<CompareToggleResponse>> {
    let mut compare: CompareList = session::load(&session, keys::COMPARE).await?;

    if !compare.ids().contains(&id) && state.catalog().find(state.pool(), id).await?.is_none() {
        return Err(AppError::NotFound("Shoe".to_string()));
    }

    let result = compare.toggle(id);
    if result != CompareToggle::Full {
        session::store(&session, keys::COMPARE, &compare).await?;
    }

    Ok(Json(CompareToggleResponse {
        result,
        ids: compare.ids().to_vec(),
    }))
}

/// Remove one shoe from the compare list.
pub async fn remove(session: Session, Path(id): Path<ShoeId>) -> Result<StatusCode> {
    let mut compare: CompareList = session::load(&session, keys::COMPARE).await?;
    if !compare.remove(id) {
        return Err(AppError::NotFound("Compare item".to_string()));
    }
    session::store(&session, keys::COMPARE, &compare).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Empty the compare list.
pub async fn clear(session: Session) -> Result<StatusCode> {
    session::store(&session, keys::COMPARE, &CompareList::default()).await?;
    Ok(StatusCode::NO_CONTENT)
}
