//! Shopping cart.

use serde::{Deserialize, Serialize};

use crate::models::order::MAX_LINE_QUANTITY;
use crate::models::{OrderLineInput, Shoe};
use crate::types::{Price, ShoeId};

/// A cart line. Lines are identified by shoe, size and color together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub shoe_id: ShoeId,
    pub name: String,
    pub brand: String,
    pub image: String,
    /// Price when the line was added; checkout re-reads the catalog price.
    pub price: Price,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

impl CartLine {
    /// Build a line for `shoe` in the given size and color.
    #[must_use]
    pub fn new(shoe: &Shoe, size: &str, color: &str, quantity: u32) -> Self {
        Self {
            shoe_id: shoe.id,
            name: shoe.name.clone(),
            brand: shoe.brand.clone(),
            image: shoe.image.clone(),
            price: shoe.price,
            size: size.trim().to_owned(),
            color: color.trim().to_owned(),
            quantity: quantity.min(max_quantity()),
        }
    }

    fn is(&self, shoe_id: ShoeId, size: &str, color: &str) -> bool {
        self.shoe_id == shoe_id && self.size == size.trim() && self.color == color.trim()
    }

    /// Price times quantity.
    ///
    /// Falls back to the unit price if the product overflows `Decimal`, which
    /// quantities capped at [`MAX_LINE_QUANTITY`] cannot reach.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.line_total(self.quantity).unwrap_or(self.price)
    }
}

const fn max_quantity() -> u32 {
    MAX_LINE_QUANTITY.unsigned_abs()
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a line, merging quantities with an existing line for the same
    /// shoe, size and color.
    pub fn add(&mut self, line: CartLine) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.is(line.shoe_id, &line.size, &line.color))
        {
            existing.quantity = existing
                .quantity
                .saturating_add(line.quantity)
                .min(max_quantity());
        } else {
            self.lines.push(line);
        }
    }

    /// Remove a line. Returns `false` if no such line exists.
    pub fn remove(&mut self, shoe_id: ShoeId, size: &str, color: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| !l.is(shoe_id, size, color));
        self.lines.len() != before
    }

    /// Set the quantity of a line; zero or less removes it.
    ///
    /// Returns `false` if no such line exists.
    pub fn update_quantity(
        &mut self,
        shoe_id: ShoeId,
        size: &str,
        color: &str,
        quantity: i64,
    ) -> bool {
        if quantity <= 0 {
            return self.remove(shoe_id, size, color);
        }
        let Some(line) = self.lines.iter_mut().find(|l| l.is(shoe_id, size, color)) else {
            return false;
        };
        line.quantity = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(max_quantity());
        true
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// The cart as order lines for checkout.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLineInput> {
        self.lines
            .iter()
            .map(|l| OrderLineInput {
                shoe_id: l.shoe_id,
                size: l.size.clone(),
                color: l.color.clone(),
                quantity: i32::try_from(l.quantity).unwrap_or(MAX_LINE_QUANTITY),
            })
            .collect()
    }
}
