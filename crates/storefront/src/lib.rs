//! Edge Shoes storefront library.
//!
//! Catalog browsing, session-held shopping state (cart, wishlist, compare,
//! recently viewed) and order placement, exposed as a JSON API.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
