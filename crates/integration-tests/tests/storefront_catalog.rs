//! Integration tests for the storefront catalog.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (es-cli migrate)
//! - The storefront running with `CATALOG_CACHE_TTL_SECS=0`
//! - `ADMIN_DATABASE_URL` or `DATABASE_URL` for seeding shoes

use reqwest::StatusCode;
use serde_json::Value;

use edge_shoes_core::Shoe;
use edge_shoes_integration_tests::{
    remove_shoe, seed_shoe, session_client, storefront_base_url, test_pool,
};

// ============================================================================
// Health & Banner
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health_endpoints() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to call /health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to call /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_banner_and_request_id() {
    let client = session_client();
    let resp = client
        .get(format!("{}/", storefront_base_url()))
        .header("x-request-id", "it-banner-1")
        .send()
        .await
        .expect("Failed to call /");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("it-banner-1")
    );
    let body: Value = resp.json().await.expect("Failed to parse banner");
    assert_eq!(body["message"], "Shoe Store API is running!");
}

// ============================================================================
// Listing & Filters
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_listing_filters_new_shoe() {
    let pool = test_pool().await;
    let shoe = seed_shoe(&pool, "Filter-Runner").await;

    let client = session_client();
    let base_url = storefront_base_url();

    // Search by name
    let resp = client
        .get(format!("{base_url}/api/shoes?q={}", shoe.name))
        .send()
        .await
        .expect("Failed to search shoes");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(body["count"], 1);
    assert_eq!(body["shoes"][0]["id"], shoe.id.as_i32());

    // Matching category, brand, price window and size
    let resp = client
        .get(format!(
            "{base_url}/api/shoes?q={}&category=Running&brand=testbrand\
             &min_price=100&max_price=130&sizes=9.0,12",
            shoe.name
        ))
        .send()
        .await
        .expect("Failed to filter shoes");
    let body: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(body["count"], 1);

    // Price window that excludes it
    let resp = client
        .get(format!("{base_url}/api/shoes?q={}&max_price=99.99", shoe.name))
        .send()
        .await
        .expect("Failed to filter shoes");
    let body: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(body["count"], 0);

    remove_shoe(&pool, &shoe).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_listing_rejects_bad_query() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/shoes?min_price=50&max_price=10"))
        .send()
        .await
        .expect("Failed to call listing");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "min_price cannot be greater than max_price");

    let resp = client
        .get(format!("{base_url}/api/shoes?sort=sideways"))
        .send()
        .await
        .expect("Failed to call listing");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_highlights_and_facets_shape() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/shoes/highlights"))
        .send()
        .await
        .expect("Failed to get highlights");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse highlights");
    assert!(body.is_object());

    let resp = client
        .get(format!("{base_url}/api/catalog/facets"))
        .send()
        .await
        .expect("Failed to get facets");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse facets");
    assert!(body.is_object());
}

// ============================================================================
// Detail
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_detail_and_missing_shoe() {
    let pool = test_pool().await;
    let created = seed_shoe(&pool, "Detail-Runner").await;

    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/shoes/{}", created.id))
        .send()
        .await
        .expect("Failed to get shoe");
    assert_eq!(resp.status(), StatusCode::OK);
    let shoe: Shoe = resp.json().await.expect("Failed to parse shoe");
    assert_eq!(shoe.id, created.id);
    assert_eq!(shoe.sizes, vec!["8", "9", "10"]);

    remove_shoe(&pool, &created).await;

    let resp = client
        .get(format!("{base_url}/api/shoes/{}", created.id))
        .send()
        .await
        .expect("Failed to get shoe");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Shoe not found");
}
