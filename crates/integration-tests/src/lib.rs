//! Integration tests for Edge Shoes.
//!
//! The tests talk to running servers over HTTP and are ignored by default.
//!
//! # Running Tests
//!
//! ```bash
//! es-cli migrate
//! es-cli admin create -e "$TEST_ADMIN_EMAIL" -n Tester -p "$TEST_ADMIN_PASSWORD"
//! CATALOG_CACHE_TTL_SECS=0 cargo run -p edge-shoes-storefront &
//! cargo run -p edge-shoes-admin &
//! cargo test -p edge-shoes-integration-tests -- --ignored --test-threads=1
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - default `http://localhost:3000`
//! - `ADMIN_BASE_URL` - default `http://localhost:3001`
//! - `TEST_ADMIN_EMAIL`, `TEST_ADMIN_PASSWORD` - an existing admin account
//! - `ADMIN_DATABASE_URL` or `DATABASE_URL` - database used to seed shoes
//!
//! Login and order placement are rate limited per client IP. Each test
//! binary logs in once and reuses the session cookie, and storefront tests
//! seed shoes directly in the database.

use reqwest::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::PgPool;
use tokio::sync::OnceCell;

use edge_shoes_admin::db::{self, ShoeRepository};
use edge_shoes_core::{Shoe, ShoeInput};

/// Name of the admin session cookie.
const ADMIN_SESSION_COOKIE: &str = "edge_admin_session";

static ADMIN_COOKIE: OnceCell<String> = OnceCell::const_new();

/// Base URL for the storefront API.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Client that keeps session cookies between requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Admin credentials from the environment.
///
/// # Panics
///
/// Panics if `TEST_ADMIN_EMAIL` or `TEST_ADMIN_PASSWORD` is unset.
#[must_use]
pub fn admin_credentials() -> (String, String) {
    let email = std::env::var("TEST_ADMIN_EMAIL").expect("TEST_ADMIN_EMAIL not set");
    let password = std::env::var("TEST_ADMIN_PASSWORD").expect("TEST_ADMIN_PASSWORD not set");
    (email, password)
}

/// Log in and return the `name=value` pair of the session cookie.
async fn login_cookie() -> String {
    let (email, password) = admin_credentials();
    let resp = Client::new()
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK, "admin login failed");

    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with(ADMIN_SESSION_COOKIE))
        .find_map(|v| v.split(';').next())
        .map(str::to_owned)
        .expect("login response sets the session cookie")
}

/// Client carrying an admin session, shared by every test in the binary.
///
/// # Panics
///
/// Panics if the login fails or the client cannot be built.
pub async fn admin_client() -> Client {
    let cookie = ADMIN_COOKIE.get_or_init(login_cookie).await;

    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(cookie).expect("cookie is a valid header value"),
    );
    Client::builder()
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// A valid create payload with a unique, URL-safe name.
#[must_use]
pub fn sample_shoe(label: &str) -> Value {
    let name = format!("{label}-{}", uuid::Uuid::new_v4().simple());
    json!({
        "name": name,
        "brand": "Testbrand",
        "category": "running",
        "description": "Integration test shoe",
        "price": "120.00",
        "originalPrice": "150.00",
        "image": "/uploads/test.jpg",
        "sizes": ["8", "9", "10"],
        "colors": ["Black", "White"],
        "tags": ["test"],
        "rating": "4.5",
        "reviews": 10,
        "stock": 5
    })
}

/// Create a shoe through the admin API.
///
/// # Panics
///
/// Panics if the shoe is not created.
pub async fn create_shoe(admin: &Client, payload: &Value) -> Shoe {
    let resp = admin
        .post(format!("{}/api/shoes", admin_base_url()))
        .json(payload)
        .send()
        .await
        .expect("Failed to create shoe");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse shoe")
}

/// Connection pool for seeding test data.
///
/// # Panics
///
/// Panics if no database URL is set or the database is unreachable.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("ADMIN_DATABASE_URL or DATABASE_URL not set");
    db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to database")
}

/// Insert a sample shoe directly in the database.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn seed_shoe(pool: &PgPool, label: &str) -> Shoe {
    seed_shoe_with(pool, &sample_shoe(label)).await
}

/// Insert a shoe built from a create payload directly in the database.
///
/// # Panics
///
/// Panics if the payload is invalid or the insert fails.
pub async fn seed_shoe_with(pool: &PgPool, payload: &Value) -> Shoe {
    let input: ShoeInput =
        serde_json::from_value(payload.clone()).expect("shoe payload deserializes");
    let draft = input.validate().expect("shoe payload is valid");
    ShoeRepository::new(pool)
        .create(&draft)
        .await
        .expect("Failed to insert shoe")
}

/// Number of stored orders placed with `email`.
///
/// # Panics
///
/// Panics if the query fails.
pub async fn order_count_for(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM shop.customer_order WHERE customer_email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("Failed to count orders")
}

/// Current stock of a shoe, read from the database.
///
/// # Panics
///
/// Panics if the shoe no longer exists.
pub async fn stock_of(pool: &PgPool, shoe: &Shoe) -> i32 {
    ShoeRepository::new(pool)
        .get(shoe.id)
        .await
        .expect("Failed to load shoe")
        .expect("shoe exists")
        .stock
}

/// Delete a seeded shoe, ignoring failures.
pub async fn remove_shoe(pool: &PgPool, shoe: &Shoe) {
    let _ = ShoeRepository::new(pool).delete(shoe.id).await;
}

/// Customer block for order payloads.
#[must_use]
pub fn sample_customer() -> Value {
    json!({
        "name": "Test Customer",
        "email": "customer@example.com",
        "phone": "+1 555 0100",
        "address": "1 Test Street, Testville"
    })
}
