//! Orders placed through the storefront.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, EmailError, OrderId, OrderItemId, OrderStatus, Price, ShoeId};

/// Largest quantity accepted on a single order line.
pub const MAX_LINE_QUANTITY: i32 = 99;

/// Customer details submitted with an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: String,
}

/// One requested line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub shoe_id: ShoeId,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: i32,
}

/// Order placement payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer: CustomerInfo,
    pub items: Vec<OrderLineInput>,
}

/// Errors produced by [`NewOrder::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("order must contain at least one item")]
    NoItems,
    #[error("quantity for shoe {shoe_id} must be between 1 and 99")]
    InvalidQuantity { shoe_id: ShoeId },
    #[error("customer name is required")]
    MissingName,
    #[error("shipping address is required")]
    MissingAddress,
    #[error("invalid customer email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Customer details after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCustomer {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: String,
}

/// An order payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNewOrder {
    pub customer: ValidCustomer,
    pub items: Vec<OrderLineInput>,
}

impl NewOrder {
    /// Validate the payload.
    ///
    /// Sizes and colors are trimmed; an empty phone number becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns the first [`OrderValidationError`] encountered.
    pub fn validate(&self) -> Result<ValidNewOrder, OrderValidationError> {
        if self.items.is_empty() {
            return Err(OrderValidationError::NoItems);
        }
        if let Some(line) = self
            .items
            .iter()
            .find(|line| !(1..=MAX_LINE_QUANTITY).contains(&line.quantity))
        {
            return Err(OrderValidationError::InvalidQuantity {
                shoe_id: line.shoe_id,
            });
        }

        let name = self.customer.name.trim();
        if name.is_empty() {
            return Err(OrderValidationError::MissingName);
        }
        let address = self.customer.address.trim();
        if address.is_empty() {
            return Err(OrderValidationError::MissingAddress);
        }
        let email = Email::parse(&self.customer.email)?;
        let phone = self
            .customer
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned);

        Ok(ValidNewOrder {
            customer: ValidCustomer {
                name: name.to_owned(),
                email,
                phone,
                address: address.to_owned(),
            },
            items: self
                .items
                .iter()
                .map(|line| OrderLineInput {
                    shoe_id: line.shoe_id,
                    size: line.size.trim().to_owned(),
                    color: line.color.trim().to_owned(),
                    quantity: line.quantity,
                })
                .collect(),
        })
    }
}

/// A placed order with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub total: Price,
    pub item_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A line of a placed order.
///
/// Name, brand and price are snapshots taken when the order was placed.
/// `shoe_id` becomes `None` once the shoe is deleted from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub shoe_id: Option<ShoeId>,
    pub name: String,
    pub brand: String,
    pub size: String,
    pub color: String,
    pub quantity: i32,
    pub unit_price: Price,
    pub line_total: Price,
    /// Whether stock was decremented for this line.
    pub stock_reserved: bool,
}
