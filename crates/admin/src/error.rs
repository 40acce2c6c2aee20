//! Unified error handling for admin.
//!
//! Every handler returns `Result<T, AppError>`; errors reach the client as
//! `{"error": "<message>"}` and server errors are captured to Sentry.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use edge_shoes_core::ShoeValidationError;

use crate::db::RepositoryError;
use crate::services::{AuthError, UploadError};

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Login or account creation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Image upload or removal failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Shoe payload failed validation.
    #[error("{0}")]
    InvalidShoe(#[from] ShoeValidationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound)
            | Self::Upload(UploadError::NotFound)
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Auth(AuthError::AdminAlreadyExists) => {
                StatusCode::CONFLICT
            }
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::WeakPassword(_))
            | Self::Upload(
                UploadError::NoFile
                | UploadError::TooLarge(_)
                | UploadError::InvalidType
                | UploadError::InvalidFilename
                | UploadError::Multipart(_),
            )
            | Self::InvalidShoe(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_)
            | Self::Session(_)
            | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
            | Self::Upload(UploadError::Io(_))
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid email or password".to_string(),
            Self::Auth(err @ (AuthError::AdminAlreadyExists | AuthError::WeakPassword(_))) => {
                err.to_string()
            }
            Self::Upload(UploadError::Multipart(_)) => "Malformed upload".to_string(),
            Self::Upload(err) if !matches!(err, UploadError::Io(_)) => err.to_string(),
            Self::InvalidShoe(err) => err.to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::BadRequest(msg) => msg.clone(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from an admin user ID.
pub fn set_sentry_user(admin_user_id: i32, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn respond(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_upload_errors_are_client_errors() {
        let (status, body) = respond(AppError::Upload(UploadError::InvalidType)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Only image files are allowed!");

        let (status, body) = respond(AppError::Upload(UploadError::NotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Image not found");
    }

    #[tokio::test]
    async fn test_io_errors_are_hidden() {
        let io = std::io::Error::other("disk on fire");
        let (status, body) = respond(AppError::Upload(UploadError::Io(io))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_invalid_credentials_are_generic() {
        let (status, body) = respond(AppError::Auth(AuthError::InvalidCredentials)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_conflict_message_is_shown() {
        let err = AppError::Database(RepositoryError::Conflict(
            "Cannot change order status from delivered to pending".to_string(),
        ));
        let (status, body) = respond(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            "Cannot change order status from delivered to pending"
        );
    }

    #[tokio::test]
    async fn test_invalid_shoe_is_bad_request() {
        let (status, body) = respond(AppError::InvalidShoe(ShoeValidationError::MissingName)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().to_lowercase().contains("name"));
    }
}
