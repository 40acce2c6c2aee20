//! Catalog shoes and the admin payload used to create or update them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ShoeId};

/// Stock assigned to new shoes when the payload omits it.
pub const DEFAULT_STOCK: i32 = 50;

/// Highest price a shoe can carry, the limit of a `NUMERIC(10, 2)` column.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Highest allowed rating.
pub const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// A shoe in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shoe {
    pub id: ShoeId,
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub image: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub tags: Vec<String>,
    pub rating: Decimal,
    pub reviews: i32,
    pub stock: i32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shoe {
    /// Whether the shoe carries `tag` (case-insensitive).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether `size` is one of the offered sizes.
    ///
    /// A shoe that lists no sizes accepts any size.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        offers_size(&self.sizes, size)
    }

    /// Whether `color` is one of the offered colors.
    ///
    /// A shoe that lists no colors accepts any color.
    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        offers_color(&self.colors, color)
    }

    /// Check that a requested size and color are both offered.
    ///
    /// # Errors
    ///
    /// Returns [`UnavailableOption`] naming the first option not offered.
    pub fn check_options(&self, size: &str, color: &str) -> Result<(), UnavailableOption> {
        check_options(&self.name, &self.sizes, &self.colors, size, color)
    }

    /// Whether the shoe is marked down from an original price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }
}

fn offers_size(sizes: &[String], size: &str) -> bool {
    sizes.is_empty() || sizes.iter().any(|s| crate::catalog::sizes_match(s, size))
}

fn offers_color(colors: &[String], color: &str) -> bool {
    let color = color.trim();
    colors.is_empty() || colors.iter().any(|c| c.eq_ignore_ascii_case(color))
}

/// A requested size or color the shoe does not offer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UnavailableOption {
    #[error("Size '{size}' is not available for {shoe}")]
    Size { shoe: String, size: String },
    #[error("Color '{color}' is not available for {shoe}")]
    Color { shoe: String, color: String },
}

/// Check a size and color against a shoe's offered options.
///
/// Empty option lists accept anything.
///
/// # Errors
///
/// Returns [`UnavailableOption`] naming the first option not offered.
pub fn check_options(
    name: &str,
    sizes: &[String],
    colors: &[String],
    size: &str,
    color: &str,
) -> Result<(), UnavailableOption> {
    if !offers_size(sizes, size) {
        return Err(UnavailableOption::Size {
            shoe: name.to_owned(),
            size: size.to_owned(),
        });
    }
    if !offers_color(colors, color) {
        return Err(UnavailableOption::Color {
            shoe: name.to_owned(),
            color: color.to_owned(),
        });
    }
    Ok(())
}

/// Errors produced by [`ShoeInput::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShoeValidationError {
    #[error("name is required")]
    MissingName,
    #[error("brand is required")]
    MissingBrand,
    #[error("image is required")]
    MissingImage,
    #[error("{0}")]
    InvalidCategory(String),
    #[error("price must be greater than zero")]
    NonPositivePrice,
    #[error("original price must be greater than zero")]
    NonPositiveOriginalPrice,
    #[error("price cannot exceed 99999999.99")]
    PriceTooHigh,
    #[error("original price cannot exceed 99999999.99")]
    OriginalPriceTooHigh,
    #[error("rating must be between 0 and 5")]
    RatingOutOfRange,
    #[error("reviews cannot be negative")]
    NegativeReviews,
    #[error("stock cannot be negative")]
    NegativeStock,
}

/// Create/update payload for a shoe, as posted by the admin panel.
///
/// Fields are loose on the wire; [`ShoeInput::validate`] turns them into a
/// [`ShoeDraft`] ready for insertion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoeInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub reviews: Option<i32>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub featured: Option<bool>,
}

/// A validated shoe, ready to be written to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoeDraft {
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub description: String,
    pub price: Price,
    pub original_price: Option<Price>,
    pub image: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub tags: Vec<String>,
    pub rating: Decimal,
    pub reviews: i32,
    pub stock: i32,
    pub featured: bool,
}

impl ShoeInput {
    /// Validate and normalize the payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`ShoeValidationError`] encountered.
    pub fn validate(&self) -> Result<ShoeDraft, ShoeValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ShoeValidationError::MissingName);
        }
        let brand = self.brand.trim();
        if brand.is_empty() {
            return Err(ShoeValidationError::MissingBrand);
        }
        let image = self.image.trim();
        if image.is_empty() {
            return Err(ShoeValidationError::MissingImage);
        }
        let category = self
            .category
            .parse::<Category>()
            .map_err(ShoeValidationError::InvalidCategory)?;

        if self.price.is_zero() {
            return Err(ShoeValidationError::NonPositivePrice);
        }
        if self.original_price.is_some_and(|p| p.is_zero()) {
            return Err(ShoeValidationError::NonPositiveOriginalPrice);
        }
        if self.price.amount() > MAX_PRICE {
            return Err(ShoeValidationError::PriceTooHigh);
        }
        if self.original_price.is_some_and(|p| p.amount() > MAX_PRICE) {
            return Err(ShoeValidationError::OriginalPriceTooHigh);
        }

        let rating = self.rating.unwrap_or(Decimal::ZERO);
        if rating < Decimal::ZERO || rating > MAX_RATING {
            return Err(ShoeValidationError::RatingOutOfRange);
        }
        let reviews = self.reviews.unwrap_or(0);
        if reviews < 0 {
            return Err(ShoeValidationError::NegativeReviews);
        }
        let stock = self.stock.unwrap_or(DEFAULT_STOCK);
        if stock < 0 {
            return Err(ShoeValidationError::NegativeStock);
        }

        Ok(ShoeDraft {
            name: name.to_owned(),
            brand: brand.to_owned(),
            category,
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_owned(),
            price: self.price,
            original_price: self.original_price,
            image: image.to_owned(),
            sizes: clean_list(&self.sizes),
            colors: clean_list(&self.colors),
            tags: clean_list(&self.tags),
            rating: rating.round_dp(1),
            reviews,
            stock,
            featured: self.featured.unwrap_or(false),
        })
    }
}

fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> ShoeInput {
        ShoeInput {
            name: " Air Zoom Pegasus ".to_owned(),
            brand: "Nike".to_owned(),
            category: "Running".to_owned(),
            price: Price::parse("129.99").unwrap(),
            image: "/uploads/shoe-1.jpg".to_owned(),
            sizes: vec!["8".to_owned(), " ".to_owned(), "9.5 ".to_owned()],
            ..ShoeInput::default()
        }
    }

    #[test]
    fn test_validate_applies_defaults() {
        let draft = input().validate().unwrap();
        assert_eq!(draft.name, "Air Zoom Pegasus");
        assert_eq!(draft.category, Category::Running);
        assert_eq!(draft.stock, DEFAULT_STOCK);
        assert_eq!(draft.rating, Decimal::ZERO);
        assert_eq!(draft.reviews, 0);
        assert!(!draft.featured);
        assert_eq!(draft.description, "");
        assert_eq!(draft.sizes, vec!["8", "9.5"]);
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut shoe = input();
        shoe.name = "  ".to_owned();
        assert_eq!(shoe.validate(), Err(ShoeValidationError::MissingName));

        let mut shoe = input();
        shoe.image = String::new();
        assert_eq!(shoe.validate(), Err(ShoeValidationError::MissingImage));

        let mut shoe = input();
        shoe.category = "hiking".to_owned();
        assert!(matches!(
            shoe.validate(),
            Err(ShoeValidationError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_numbers() {
        let mut shoe = input();
        shoe.price = Price::ZERO;
        assert_eq!(shoe.validate(), Err(ShoeValidationError::NonPositivePrice));

        let mut shoe = input();
        shoe.rating = Some(Decimal::new(51, 1));
        assert_eq!(shoe.validate(), Err(ShoeValidationError::RatingOutOfRange));

        let mut shoe = input();
        shoe.stock = Some(-1);
        assert_eq!(shoe.validate(), Err(ShoeValidationError::NegativeStock));
    }

    #[test]
    fn test_validate_caps_prices_at_column_limit() {
        assert_eq!(MAX_PRICE.to_string(), "99999999.99");

        let mut shoe = input();
        shoe.price = Price::parse("99999999.99").unwrap();
        assert!(shoe.validate().is_ok());

        shoe.price = Price::parse("100000000").unwrap();
        assert_eq!(shoe.validate(), Err(ShoeValidationError::PriceTooHigh));

        let mut shoe = input();
        shoe.original_price = Some(Price::parse("100000000").unwrap());
        assert_eq!(shoe.validate(), Err(ShoeValidationError::OriginalPriceTooHigh));
    }

    #[test]
    fn test_check_options() {
        let sizes = vec!["9".to_owned(), "10.5".to_owned()];
        let colors = vec!["Black".to_owned()];
        assert!(check_options("Pegasus", &sizes, &colors, "10.50", " black ").is_ok());
        assert_eq!(
            check_options("Pegasus", &sizes, &colors, "12", "Black"),
            Err(UnavailableOption::Size {
                shoe: "Pegasus".to_owned(),
                size: "12".to_owned(),
            })
        );
        assert_eq!(
            check_options("Pegasus", &sizes, &colors, "9", "Red")
                .unwrap_err()
                .to_string(),
            "Color 'Red' is not available for Pegasus"
        );
        assert!(check_options("Pegasus", &[], &[], "any", "any").is_ok());
    }

    #[test]
    fn test_input_accepts_camel_case_json() {
        let json = r#"{
            "name": "Old Skool",
            "brand": "Vans",
            "category": "skate",
            "price": 70,
            "originalPrice": "85.00",
            "image": "/uploads/vans.png",
            "stock": 0
        }"#;
        let draft = serde_json::from_str::<ShoeInput>(json)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(draft.original_price, Some(Price::parse("85").unwrap()));
        assert_eq!(draft.stock, 0);
    }
}
