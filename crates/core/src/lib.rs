//! Edge Shoes Core - Shared domain library.
//!
//! This crate provides the types and pure logic used across all Edge Shoes
//! components:
//! - `storefront` - Public JSON API for the catalog, cart and checkout
//! - `admin` - Inventory management API with image uploads
//! - `cli` - Command-line tools for migrations, admin users and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Catalog filtering and the cart, wishlist and
//! compare reducers live here so both binaries and the tests share one
//! implementation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, categories and statuses
//! - [`models`] - Shoes and orders, plus their validated input payloads
//! - [`catalog`] - Filtering, sorting, highlights and facets over the catalog
//! - [`shopping`] - Cart, wishlist, compare list and recently viewed reducers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod models;
pub mod shopping;
pub mod types;

pub use catalog::{CatalogQuery, Facets, Highlights, SortOrder};
pub use models::*;
pub use shopping::{Cart, CartLine, CompareList, CompareToggle, RecentlyViewed, Wishlist};
pub use types::*;
