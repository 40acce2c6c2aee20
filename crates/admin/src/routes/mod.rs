//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health, /health/ready     - Health checks (see main.rs)
//!
//! # Auth
//! POST   /auth/login                - Password login (rate limited)
//! POST   /auth/logout               - Logout
//! GET    /auth/me                   - Current admin
//!
//! # Catalog (admin session required)
//! GET    /api/shoes                 - All shoes
//! POST   /api/shoes                 - Create shoe
//! GET    /api/shoes/{id}            - Shoe detail
//! PUT    /api/shoes/{id}            - Replace shoe
//! DELETE /api/shoes/{id}            - Delete shoe
//! PATCH  /api/shoes/{id}/stock      - Set stock
//!
//! # Images (admin session required)
//! POST   /api/upload                - Upload image (multipart field `image`)
//! GET    /api/images                - List images
//! DELETE /api/images/{filename}     - Delete image
//!
//! # Orders (admin session required)
//! GET    /api/orders                - Order listing
//! GET    /api/orders/{id}           - Order detail
//! PATCH  /api/orders/{id}/status    - Change status
//! ```

pub mod auth;
pub mod orders;
pub mod shoes;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the admin API.
pub fn routes(upload_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(shoes::router())
        .merge(uploads::router(upload_max_bytes))
        .merge(orders::router())
}
