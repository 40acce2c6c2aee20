//! Edge Shoes admin library.
//!
//! Catalog management, image uploads and order administration behind a
//! session login.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
