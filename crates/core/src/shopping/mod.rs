//! Per-visitor shopping state: cart, wishlist, compare list and recently
//! viewed shoes.
//!
//! These are plain reducers with no I/O. The storefront stores each one in
//! the visitor's session and applies one operation per request.

pub mod cart;
pub mod compare;
pub mod recently_viewed;
pub mod wishlist;

pub use cart::{Cart, CartLine};
pub use compare::{CompareList, CompareToggle};
pub use recently_viewed::RecentlyViewed;
pub use wishlist::Wishlist;
