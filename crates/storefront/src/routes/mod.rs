//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - API banner
//! GET    /health, /health/ready     - Health checks (see main.rs)
//!
//! # Catalog
//! GET    /api/shoes                 - Filtered, sorted listing
//! GET    /api/shoes/highlights      - Featured, new arrivals, best sellers, gallery
//! GET    /api/shoes/{id}            - Shoe detail (tracks recently viewed)
//! GET    /api/catalog/facets        - Category and brand filters with counts
//!
//! # Cart (session)
//! GET    /api/cart                  - Current cart
//! POST   /api/cart/items            - Add line
//! PATCH  /api/cart/items            - Set line quantity
//! DELETE /api/cart/items            - Remove line
//! DELETE /api/cart                  - Empty cart
//! POST   /api/cart/checkout         - Place order from cart (rate limited)
//!
//! # Wishlist / compare / recently viewed (session)
//! GET    /api/wishlist
//! POST   /api/wishlist/{id}/toggle
//! DELETE /api/wishlist
//! GET    /api/compare
//! POST   /api/compare/{id}/toggle
//! DELETE /api/compare/{id}
//! DELETE /api/compare
//! GET    /api/recently-viewed
//! DELETE /api/recently-viewed
//!
//! # Orders
//! POST   /api/orders                - Place order (rate limited)
//! GET    /api/orders/{id}           - Order detail
//! ```

pub mod cart;
pub mod compare;
pub mod orders;
pub mod recently_viewed;
pub mod shoes;
pub mod wishlist;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::{Value, json};

use crate::middleware::order_rate_limiter;
use crate::state::AppState;

/// API banner.
pub async fn index() -> Json<Value> {
    Json(json!({ "message": "Shoe Store API is running!" }))
}

/// Create the catalog routes router.
pub fn shoe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shoes::list))
        .route("/highlights", get(shoes::highlights))
        .route("/{id}", get(shoes::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route(
            "/items",
            post(cart::add_item)
                .patch(cart::update_item)
                .delete(cart::remove_item),
        )
}

/// Create the session list routes router.
pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(wishlist::show).delete(wishlist::clear))
        .route("/wishlist/{id}/toggle", post(wishlist::toggle))
        .route("/compare", get(compare::show).delete(compare::clear))
        .route("/compare/{id}", delete(compare::remove))
        .route("/compare/{id}/toggle", post(compare::toggle))
        .route(
            "/recently-viewed",
            get(recently_viewed::show).delete(recently_viewed::clear),
        )
}

/// Create the order placement router (rate limited per client IP).
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create))
        .route("/cart/checkout", post(cart::checkout))
        .layer(order_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .nest("/api/shoes", shoe_routes())
        .route("/api/catalog/facets", get(shoes::facets))
        .nest("/api/cart", cart_routes())
        .route("/api/orders/{id}", get(orders::show))
        .merge(Router::new().nest("/api", list_routes()))
        .merge(Router::new().nest("/api", checkout_routes()))
}
