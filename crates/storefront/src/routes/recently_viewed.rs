//! Recently viewed route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;

use edge_shoes_core::catalog::resolve_ids;
use edge_shoes_core::{RecentlyViewed, Shoe};

use crate::error::Result;
use crate::models::session::{self, keys};
use crate::state::AppState;

/// Number of shoes shown in the recently viewed strip.
pub const DISPLAY_LIMIT: usize = 6;

/// Recently viewed shoes, most recent first.
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<Vec<Shoe>>> {
    let recent: RecentlyViewed = session::load(&session, keys::RECENTLY_VIEWED).await?;
    let catalog = state.catalog().shoes(state.pool()).await?;
    Ok(Json(resolve_ids(&catalog, recent.ids(), DISPLAY_LIMIT)))
}

/// Forget recently viewed shoes.
pub async fn clear(session: Session) -> Result<StatusCode> {
    session::store(&session, keys::RECENTLY_VIEWED, &RecentlyViewed::default()).await?;
    Ok(StatusCode::NO_CONTENT)
}
