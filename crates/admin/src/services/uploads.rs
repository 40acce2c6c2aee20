//! Shoe image storage on the local filesystem.
//!
//! Uploaded images are written to `UPLOADS_DIR` under a generated name and
//! served by the storefront under `/uploads`.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

/// Extensions (and MIME subtypes) accepted for upload.
pub const ALLOWED_TYPES: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

/// URL prefix images are served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Errors that can occur while storing or removing images.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    NoFile,

    #[error("File size is too large. Max {0} allowed.")]
    TooLarge(String),

    #[error("Only image files are allowed!")]
    InvalidType,

    #[error("Invalid filename")]
    InvalidFilename,

    #[error("Image not found")]
    NotFound,

    #[error("malformed multipart body: {0}")]
    Multipart(String),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored image as reported to the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    pub filename: String,
    pub url: String,
}

impl StoredImage {
    fn new(filename: String) -> Self {
        let url = format!("{PUBLIC_PREFIX}/{filename}");
        Self { filename, url }
    }
}

/// Lowercased extension of `name` if it is an accepted image type.
fn image_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_TYPES.contains(&ext.as_str()).then_some(ext)
}

/// Whether a MIME type names an accepted image type.
fn is_allowed_mime(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence
        .strip_prefix("image/")
        .is_some_and(|subtype| ALLOWED_TYPES.contains(&subtype))
}

/// Reject names that could escape the uploads directory.
fn check_filename(name: &str) -> Result<(), UploadError> {
    let suspicious = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.contains('\0');
    if suspicious {
        return Err(UploadError::InvalidFilename);
    }
    Ok(())
}

/// Generate `shoe-<unix_ms>-<random>.<ext>`.
fn generate_filename(ext: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("shoe-{millis}-{suffix}.{ext}")
}

/// Image store rooted at the uploads directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
    limit_label: String,
}

impl UploadStore {
    /// Create a store. `limit_label` is shown in the too-large error, e.g. `5MB`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize, limit_label: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
            limit_label: limit_label.into(),
        }
    }

    /// Uploads directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Largest accepted image in bytes.
    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Error for an upload over the size limit.
    #[must_use]
    pub fn too_large(&self) -> UploadError {
        UploadError::TooLarge(self.limit_label.clone())
    }

    /// Create the uploads directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Check the original file name and content type before reading the body.
    ///
    /// Returns the extension the stored file will carry.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::InvalidType` unless both the extension and the
    /// content type name an accepted image type.
    pub fn accept(&self, original_name: &str, content_type: &str) -> Result<String, UploadError> {
        let ext = image_extension(original_name).ok_or(UploadError::InvalidType)?;
        if !is_allowed_mime(content_type) {
            return Err(UploadError::InvalidType);
        }
        Ok(ext)
    }

    /// Write image bytes under a fresh name.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::NoFile` for an empty body, `UploadError::TooLarge`
    /// over the limit, or `UploadError::Io` if writing fails.
    pub async fn save(&self, ext: &str, bytes: &[u8]) -> Result<StoredImage, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::NoFile);
        }
        if bytes.len() > self.max_bytes {
            return Err(self.too_large());
        }

        let filename = generate_filename(ext);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;

        tracing::info!(filename = %filename, bytes = bytes.len(), "Image stored");
        Ok(StoredImage::new(filename))
    }

    /// Every stored image, sorted by filename.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the directory cannot be read.
    pub async fn list(&self) -> Result<Vec<StoredImage>, UploadError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && image_extension(name).is_some()
            {
                names.push(name.to_owned());
            }
        }
        names.sort();

        Ok(names.into_iter().map(StoredImage::new).collect())
    }

    /// Delete a stored image by name.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::InvalidFilename` for names with path components,
    /// `UploadError::NotFound` if no such image exists.
    pub async fn delete(&self, filename: &str) -> Result<(), UploadError> {
        check_filename(filename)?;

        match tokio::fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => {
                tracing::info!(filename = %filename, "Image deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(UploadError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> UploadStore {
        UploadStore::new(dir, 16, "16B")
    }

    #[test]
    fn test_accept_requires_extension_and_mime() {
        let store = UploadStore::new("uploads", 16, "16B");
        assert_eq!(store.accept("Runner.JPG", "image/jpeg").unwrap(), "jpg");
        assert_eq!(store.accept("a.webp", "image/webp").unwrap(), "webp");
        assert!(matches!(
            store.accept("a.png", "application/pdf"),
            Err(UploadError::InvalidType)
        ));
        assert!(matches!(
            store.accept("a.pdf", "image/png"),
            Err(UploadError::InvalidType)
        ));
        assert!(matches!(
            store.accept("noext", "image/png"),
            Err(UploadError::InvalidType)
        ));
    }

    #[test]
    fn test_generated_filename_shape() {
        let name = generate_filename("png");
        let rest = name.strip_prefix("shoe-").unwrap();
        let (stem, ext) = rest.rsplit_once('.').unwrap();
        assert_eq!(ext, "png");
        let (millis, suffix) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert!(suffix.parse::<u32>().unwrap() < 1_000_000_000);
    }

    #[test]
    fn test_check_filename_rejects_traversal() {
        assert!(check_filename("shoe-1-2.png").is_ok());
        for bad in ["", "../secret", "a/b.png", "a\\b.png", "..", "x..png"] {
            assert!(
                matches!(check_filename(bad), Err(UploadError::InvalidFilename)),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(UploadError::NoFile.to_string(), "No file uploaded");
        assert_eq!(
            UploadError::TooLarge("5MB".to_string()).to_string(),
            "File size is too large. Max 5MB allowed."
        );
        assert_eq!(
            UploadError::InvalidType.to_string(),
            "Only image files are allowed!"
        );
        assert_eq!(UploadError::NotFound.to_string(), "Image not found");
    }

    #[tokio::test]
    async fn test_save_list_delete() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp.path().join("uploads"));
        store.ensure_dir().await.unwrap();

        let saved = store.save("png", b"not really png").await.unwrap();
        assert!(saved.url.starts_with("/uploads/shoe-"));
        tokio::fs::write(store.dir().join("notes.txt"), b"x")
            .await
            .unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![saved.clone()]);

        store.delete(&saved.filename).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.delete(&saved.filename).await,
            Err(UploadError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_save_rejects_empty_and_oversized() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        assert!(matches!(store.save("png", b"").await, Err(UploadError::NoFile)));
        let err = store.save("png", &[0_u8; 17]).await.unwrap_err();
        assert_eq!(err.to_string(), "File size is too large. Max 16B allowed.");
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(&tmp.path().join("missing"));
        assert!(store.list().await.unwrap().is_empty());
    }
}
