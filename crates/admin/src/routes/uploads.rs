//! Image upload route handlers.
//!
//! ```text
//! POST   /api/upload               - Multipart upload, field `image`
//! GET    /api/images               - Stored images
//! DELETE /api/images/{filename}    - Remove an image
//! ```

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::services::{StoredImage, UploadError, UploadStore};
use crate::state::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Room for multipart boundaries and headers on top of the image limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Upload response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub image_url: String,
    pub filename: String,
}

/// Image listing response.
#[derive(Debug, Serialize)]
pub struct ImageList {
    pub images: Vec<StoredImage>,
}

/// Build the uploads router. Bodies are capped a little above `max_bytes` so
/// oversized files are reported with the size message.
pub fn router(max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/api/upload",
            post(upload).layer(DefaultBodyLimit::max(max_bytes + MULTIPART_OVERHEAD)),
        )
        .route("/api/images", get(list))
        .route("/api/images/{filename}", delete(remove))
}

fn multipart_error(err: &MultipartError, store: &UploadStore) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        store.too_large()
    } else {
        UploadError::Multipart(err.body_text())
    }
}

/// Read the `image` field, enforcing type and size before it is written.
async fn read_image(
    multipart: &mut Multipart,
    store: &UploadStore,
) -> std::result::Result<(String, Vec<u8>), UploadError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, store))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let Some(original_name) = field.file_name().map(str::to_owned) else {
            return Err(UploadError::NoFile);
        };
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let ext = store.accept(&original_name, &content_type)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(&e, store))?
        {
            if bytes.len() + chunk.len() > store.max_bytes() {
                return Err(store.too_large());
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok((ext, bytes));
    }

    Err(UploadError::NoFile)
}

async fn upload(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let store = state.uploads();
    let (ext, bytes) = read_image(&mut multipart, store).await?;
    let stored = store.save(&ext, &bytes).await?;

    tracing::info!(admin_id = %admin.id, filename = %stored.filename, "Image uploaded");
    Ok(Json(UploadResponse {
        success: true,
        image_url: stored.url,
        filename: stored.filename,
    }))
}

async fn list(_: RequireAdminAuth, State(state): State<AppState>) -> Result<Json<ImageList>> {
    let images = state.uploads().list().await?;
    Ok(Json(ImageList { images }))
}

async fn remove(
    _: RequireAdminAuth,
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Value>> {
    state.uploads().delete(&filename).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Image deleted successfully",
    })))
}
