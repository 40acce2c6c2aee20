//! Authentication extractor and session helpers for admin.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires admin authentication.
///
/// Rejects with 401 and `{"error": "Authentication required"}` when no admin
/// is logged in.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Rejection for requests without an admin session.
#[derive(Debug)]
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Authentication required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection)?;

        Ok(Self(admin))
    }
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use tower_sessions::MemoryStore;

    use edge_shoes_core::{AdminUserId, Email};

    use super::*;

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::new(1),
            email: Email::parse("boss@edgeshoes.example").unwrap(),
            name: "Boss".to_string(),
        }
    }

    async fn extract(session: Option<Session>) -> Result<RequireAdminAuth, AdminAuthRejection> {
        let (mut parts, ()) = Request::builder()
            .uri("/api/shoes")
            .body(())
            .unwrap()
            .into_parts();
        if let Some(session) = session {
            parts.extensions.insert(session);
        }
        RequireAdminAuth::from_request_parts(&mut parts, &()).await
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_rejects_without_session_layer() {
        assert!(extract(None).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_anonymous_session() {
        assert!(extract(Some(session())).await.is_err());
    }

    #[tokio::test]
    async fn test_login_and_logout_round_trip() {
        let session = session();
        set_current_admin(&session, &admin()).await.unwrap();

        let RequireAdminAuth(found) = extract(Some(session.clone())).await.unwrap();
        assert_eq!(found, admin());

        clear_current_admin(&session).await.unwrap();
        assert!(extract(Some(session)).await.is_err());
    }

    #[test]
    fn test_rejection_is_401() {
        assert_eq!(
            AdminAuthRejection.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
