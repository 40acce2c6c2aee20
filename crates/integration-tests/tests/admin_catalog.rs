//! Integration tests for admin login, catalog management and image uploads.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (es-cli migrate)
//! - The admin server running (cargo run -p edge-shoes-admin)
//! - An admin account matching `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`
//!
//! Login is rate limited per client IP; run with `--test-threads=1`.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::{Value, json};

use edge_shoes_core::Shoe;
use edge_shoes_integration_tests::{
    admin_base_url, admin_client, admin_credentials, create_shoe, sample_shoe, session_client,
};

// 1x1 transparent PNG
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn image_form(file_name: &str, mime: &str, bytes: &[u8]) -> Form {
    let part = Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str(mime)
        .expect("valid mime");
    Form::new().part("image", part)
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_api_requires_login() {
    let client = session_client();
    let resp = client
        .get(format!("{}/api/shoes", admin_base_url()))
        .send()
        .await
        .expect("Failed to call admin API");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
#[ignore = "Requires running admin server and a test admin account"]
async fn test_login_me_logout() {
    let client = session_client();
    let base_url = admin_base_url();
    let (email, password) = admin_credentials();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": "definitely wrong" }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Invalid email or password");

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);
    let admin: Value = resp.json().await.expect("Failed to parse admin");
    assert!(admin.get("passwordHash").is_none());

    let me: Value = client
        .get(format!("{base_url}/auth/me"))
        .send()
        .await
        .expect("Failed to call /auth/me")
        .json()
        .await
        .expect("Failed to parse /auth/me");
    assert_eq!(me["id"], admin["id"]);

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/auth/me"))
        .send()
        .await
        .expect("Failed to call /auth/me");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Catalog CRUD
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and a test admin account"]
async fn test_shoe_crud() {
    let admin = admin_client().await;
    let base_url = admin_base_url();

    let created = create_shoe(&admin, &sample_shoe("Crud-Runner")).await;
    assert_eq!(created.stock, 5);
    assert_eq!(created.price.to_string(), "120.00");

    let mut payload = sample_shoe("Crud-Renamed");
    payload["category"] = json!("Casual");
    payload["featured"] = json!(true);
    let resp = admin
        .put(format!("{base_url}/api/shoes/{}", created.id))
        .json(&payload)
        .send()
        .await
        .expect("Failed to update shoe");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Shoe = resp.json().await.expect("Failed to parse shoe");
    assert_eq!(updated.id, created.id);
    assert!(updated.name.starts_with("Crud-Renamed"));
    assert!(updated.featured);

    let list: Value = admin
        .get(format!("{base_url}/api/shoes"))
        .send()
        .await
        .expect("Failed to list shoes")
        .json()
        .await
        .expect("Failed to parse listing");
    let listed = list["shoes"]
        .as_array()
        .expect("shoes array")
        .iter()
        .any(|s| s["id"] == created.id.as_i32());
    assert!(listed);

    let resp = admin
        .delete(format!("{base_url}/api/shoes/{}", created.id))
        .send()
        .await
        .expect("Failed to delete shoe");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = admin
        .get(format!("{base_url}/api/shoes/{}", created.id))
        .send()
        .await
        .expect("Failed to get shoe");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Shoe not found");
}

#[tokio::test]
#[ignore = "Requires running admin server and a test admin account"]
async fn test_invalid_shoe_is_rejected() {
    let admin = admin_client().await;
    let base_url = admin_base_url();

    let mut payload = sample_shoe("Invalid-Runner");
    payload["name"] = json!("   ");
    let resp = admin
        .post(format!("{base_url}/api/shoes"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to post shoe");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "name is required");

    let mut payload = sample_shoe("Invalid-Runner");
    payload["category"] = json!("hiking");
    let resp = admin
        .post(format!("{base_url}/api/shoes"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to post shoe");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Larger than the price column holds
    let mut payload = sample_shoe("Invalid-Runner");
    payload["price"] = json!(100_000_000);
    let resp = admin
        .post(format!("{base_url}/api/shoes"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to post shoe");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "price cannot exceed 99999999.99");
}

#[tokio::test]
#[ignore = "Requires running admin server and a test admin account"]
async fn test_set_stock() {
    let admin = admin_client().await;
    let base_url = admin_base_url();
    let shoe = create_shoe(&admin, &sample_shoe("Stock-Runner")).await;
    let stock_url = format!("{base_url}/api/shoes/{}/stock", shoe.id);

    let resp = admin
        .patch(&stock_url)
        .json(&json!({ "stock": 42 }))
        .send()
        .await
        .expect("Failed to set stock");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Shoe = resp.json().await.expect("Failed to parse shoe");
    assert_eq!(updated.stock, 42);

    let resp = admin
        .patch(&stock_url)
        .json(&json!({ "stock": -1 }))
        .send()
        .await
        .expect("Failed to set stock");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Stock cannot be negative");

    let _ = admin
        .delete(format!("{base_url}/api/shoes/{}", shoe.id))
        .send()
        .await;
}

// ============================================================================
// Image Uploads
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and a test admin account"]
async fn test_upload_list_delete_image() {
    let admin = admin_client().await;
    let base_url = admin_base_url();

    let resp = admin
        .post(format!("{base_url}/api/upload"))
        .multipart(image_form("Tiny.PNG", "image/png", TINY_PNG))
        .send()
        .await
        .expect("Failed to upload image");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse upload");
    assert_eq!(body["success"], true);
    let filename = body["filename"].as_str().expect("filename").to_string();
    assert!(filename.starts_with("shoe-"));
    assert!(filename.ends_with(".png"));
    assert_eq!(body["imageUrl"], format!("/uploads/{filename}"));

    let images: Value = admin
        .get(format!("{base_url}/api/images"))
        .send()
        .await
        .expect("Failed to list images")
        .json()
        .await
        .expect("Failed to parse images");
    let listed = images["images"]
        .as_array()
        .expect("images array")
        .iter()
        .any(|i| i["filename"] == filename.as_str());
    assert!(listed);

    let resp = admin
        .delete(format!("{base_url}/api/images/{filename}"))
        .send()
        .await
        .expect("Failed to delete image");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse delete");
    assert_eq!(body["message"], "Image deleted successfully");

    let resp = admin
        .delete(format!("{base_url}/api/images/{filename}"))
        .send()
        .await
        .expect("Failed to delete image");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Image not found");
}

#[tokio::test]
#[ignore = "Requires running admin server and a test admin account"]
async fn test_upload_rejects_non_images() {
    let admin = admin_client().await;
    let base_url = admin_base_url();

    let resp = admin
        .post(format!("{base_url}/api/upload"))
        .multipart(image_form("notes.txt", "text/plain", b"hello"))
        .send()
        .await
        .expect("Failed to upload file");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Only image files are allowed!");

    let resp = admin
        .post(format!("{base_url}/api/upload"))
        .multipart(Form::new().text("caption", "no file here"))
        .send()
        .await
        .expect("Failed to upload form");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "No file uploaded");
}
