//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Argon2id password login for admin accounts
//! - `uploads` - Shoe image storage in the uploads directory

pub mod auth;
pub mod uploads;

pub use auth::{AuthError, AuthService};
pub use uploads::{StoredImage, UploadError, UploadStore};
