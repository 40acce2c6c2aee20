//! Admin authentication route handlers.
//!
//! ```text
//! POST /auth/login   {email, password}  - Start a session (rate limited)
//! POST /auth/logout                     - End the session
//! GET  /auth/me                         - Current admin
//! ```

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAdminAuth, clear_current_admin, login_rate_limiter, set_current_admin};
use crate::models::{AdminUser, CurrentAdmin};
use crate::services::AuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login).layer(login_rate_limiter()))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

/// Verify credentials and store the admin in a fresh session.
///
/// POST /auth/login
#[instrument(skip_all, fields(email = %body.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AdminUser>> {
    let admin = match AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await
    {
        Ok(admin) => admin,
        Err(e) => {
            tracing::warn!(error = %e, "Admin login failed");
            return Err(e.into());
        }
    };

    // New session ID on privilege change
    session.cycle_id().await?;
    set_current_admin(&session, &CurrentAdmin::from(&admin)).await?;
    set_sentry_user(admin.id.as_i32(), Some(admin.email.as_str()));

    tracing::info!(admin_id = %admin.id, "Admin logged in");
    Ok(Json(admin))
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    session.flush().await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// Current admin.
///
/// GET /auth/me
async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}
