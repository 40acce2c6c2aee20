//! Storefront-specific models.
//!
//! Catalog and order types live in `edge-shoes-core`; this module only holds
//! what the storefront keeps in the visitor session.

pub mod session;

pub use session::keys as session_keys;
