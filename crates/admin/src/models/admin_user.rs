//! Admin user domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use edge_shoes_core::{AdminUserId, Email};

/// An admin account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}
