//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Cached catalog snapshot shared by the listing and session routes

pub mod catalog;

pub use catalog::CatalogCache;
