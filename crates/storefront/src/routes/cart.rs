//! Cart route handlers.
//!
//! The cart is kept in the visitor session. Lines store the price seen when
//! they were added; checkout prices every line from the catalog again.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use edge_shoes_core::catalog::sizes_match;
use edge_shoes_core::{Cart, CartLine, CustomerInfo, NewOrder, Order, Price, Shoe, ShoeId};

use super::orders::{ensure_available, place_order};
use crate::error::{AppError, Result};
use crate::models::session::{self, keys};
use crate::state::AppState;

/// Cart response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total: Price,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().to_vec(),
            total: cart.total(),
            item_count: cart.item_count(),
        }
    }
}

/// Body for adding a cart line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub shoe_id: ShoeId,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: Option<i64>,
}

/// Body for changing a cart line's quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub shoe_id: ShoeId,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: i64,
}

/// Body identifying a cart line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub shoe_id: ShoeId,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

/// Body for checking out the cart.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer: CustomerInfo,
}

/// Use the shoe's own spelling of a size or color so `9` and `9.0` share a line.
fn canonical<'a>(offered: &'a [String], wanted: &'a str, same: impl Fn(&str, &str) -> bool) -> &'a str {
    offered
        .iter()
        .find(|o| same(o.as_str(), wanted))
        .map_or(wanted.trim(), String::as_str)
}

fn line_for(shoe: &Shoe, size: &str, color: &str, quantity: u32) -> CartLine {
    let size = canonical(&shoe.sizes, size, sizes_match);
    let color = canonical(&shoe.colors, color, |a, b| a.eq_ignore_ascii_case(b.trim()));
    CartLine::new(shoe, size, color, quantity)
}

async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session::load(session, keys::CART).await?)
}

async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    Ok(session::store(session, keys::CART, cart).await?)
}

/// Current cart.
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a line, merging with an existing line for the same shoe, size and color.
#[instrument(skip(state, session, body), fields(shoe_id = %body.shoe_id))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let quantity = body.quantity.unwrap_or(1);
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| AppError::BadRequest("Quantity must be at least 1".to_string()))?;

    let shoe = state
        .catalog()
        .find(state.pool(), body.shoe_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shoe".to_string()))?;
    ensure_available(&shoe, &body.size, &body.color)?;

    let mut cart = load_cart(&session).await?;
    cart.add(line_for(&shoe, &body.size, &body.color, quantity));
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Set a line's quantity; zero or less removes the line.
pub async fn update_item(
    session: Session,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.update_quantity(body.shoe_id, &body.size, &body.color, body.quantity) {
        return Err(AppError::NotFound("Cart item".to_string()));
    }
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line.
pub async fn remove_item(
    session: Session,
    Json(body): Json<RemoveItemRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.remove(body.shoe_id, &body.size, &body.color) {
        return Err(AppError::NotFound("Cart item".to_string()));
    }
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
pub async fn clear(session: Session) -> Result<StatusCode> {
    save_cart(&session, &Cart::default()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Turn the cart into an order. The cart is emptied once the order is placed.
#[instrument(skip(state, session, body))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let new_order = NewOrder {
        customer: body.customer,
        items: cart.order_lines(),
    };
    let order = place_order(&state, &new_order).await?;

    save_cart(&session, &Cart::default()).await?;
    tracing::info!(order_id = %order.id, "Cart checked out");

    Ok((StatusCode::CREATED, Json(order)))
}
