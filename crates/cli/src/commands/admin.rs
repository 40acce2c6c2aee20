//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! es-cli admin create -e admin@example.com -n "Admin Name" -p "a long password"
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` or `DATABASE_URL` - `PostgreSQL` connection string

use thiserror::Error;

use edge_shoes_admin::db;
use edge_shoes_admin::services::{AuthError, AuthService};
use edge_shoes_admin::services::auth::validate_password;
use edge_shoes_core::Email;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: ADMIN_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Display name is blank.
    #[error("Name is required")]
    MissingName,

    /// Account could not be created.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Check the arguments before touching the database.
fn check_input(email: &str, name: &str, password: &str) -> Result<Email, AdminError> {
    let email = Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;
    if name.trim().is_empty() {
        return Err(AdminError::MissingName);
    }
    validate_password(password)?;
    Ok(email)
}

/// Create a new admin account.
///
/// # Returns
///
/// The ID of the created admin.
///
/// # Errors
///
/// Returns `AdminError` for invalid input, a taken email, or database failures.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<i32, AdminError> {
    let email = check_input(email, name, password)?;

    let database_url = super::database_url().ok_or(AdminError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating admin account: {}", email);
    let admin = AuthService::new(&pool)
        .register(&email, name, password)
        .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Email: {}",
        admin.id,
        admin.email
    );

    Ok(admin.id.as_i32())
}
