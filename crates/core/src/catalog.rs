//! Catalog browsing: filtering, sorting, highlights and facets.
//!
//! The catalog is small enough to be held in memory, so the storefront loads
//! every shoe once (see its catalog cache) and runs these pure functions over
//! the slice for each request.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Shoe;
use crate::types::{Category, Price, ShoeId};

/// Number of shoes in each highlight strip.
pub const HIGHLIGHT_LIMIT: usize = 6;

/// Filter value meaning "no filter".
pub const ALL: &str = "all";

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Best rated first.
    Rating,
    /// Most recently added first.
    Newest,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "rating" => Ok(Self::Rating),
            "newest" => Ok(Self::Newest),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

/// Filters and sort order for a catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub sizes: Vec<String>,
    pub sort: SortOrder,
}

impl CatalogQuery {
    fn matches(&self, shoe: &Shoe) -> bool {
        if let Some(term) = active(self.search.as_deref()) {
            let term = term.to_lowercase();
            let hit = shoe.name.to_lowercase().contains(&term)
                || shoe.brand.to_lowercase().contains(&term)
                || shoe.category.as_str().contains(&term);
            if !hit {
                return false;
            }
        }
        if let Some(category) = active(self.category.as_deref())
            && !shoe.category.as_str().eq_ignore_ascii_case(category)
        {
            return false;
        }
        if let Some(brand) = active(self.brand.as_deref())
            && !shoe.brand.trim().eq_ignore_ascii_case(brand)
        {
            return false;
        }
        if self.min_price.is_some_and(|min| shoe.price < min)
            || self.max_price.is_some_and(|max| shoe.price > max)
        {
            return false;
        }
        let wanted: Vec<&str> = self
            .sizes
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        wanted.is_empty()
            || wanted
                .iter()
                .any(|w| shoe.sizes.iter().any(|s| sizes_match(s, w)))
    }
}

/// Treats empty strings and `"all"` as an absent filter.
fn active(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

/// Compare two shoe sizes.
///
/// Sizes that both parse as decimals compare numerically (`"9"` equals
/// `"9.0"`); anything else compares as case-insensitive text.
#[must_use]
pub fn sizes_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    match (a.parse::<Decimal>(), b.parse::<Decimal>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a.eq_ignore_ascii_case(b),
    }
}

/// Apply `query` to `shoes`, returning the matching shoes in sorted order.
#[must_use]
pub fn filter_and_sort(shoes: &[Shoe], query: &CatalogQuery) -> Vec<Shoe> {
    let mut matched: Vec<Shoe> = shoes.iter().filter(|s| query.matches(s)).cloned().collect();
    match query.sort {
        SortOrder::Featured => {}
        SortOrder::PriceLow => matched.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceHigh => matched.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Rating => matched.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortOrder::Newest => matched.sort_by(|a, b| b.id.cmp(&a.id)),
    }
    matched
}

/// Home page strips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub featured: Vec<Shoe>,
    pub new_arrivals: Vec<Shoe>,
    pub best_sellers: Vec<Shoe>,
    /// Image URLs for the hero slider.
    pub gallery: Vec<String>,
}

/// Build the home page strips.
///
/// New arrivals and best sellers prefer the `new` and `bestseller` tags and
/// fall back to the newest and most reviewed shoes when nothing is tagged.
#[must_use]
pub fn highlights(shoes: &[Shoe]) -> Highlights {
    let featured = shoes
        .iter()
        .filter(|s| s.featured || s.has_tag("featured"))
        .take(HIGHLIGHT_LIMIT)
        .cloned()
        .collect();

    let mut new_arrivals = tagged(shoes, "new");
    if new_arrivals.is_empty() {
        new_arrivals = shoes.to_vec();
        new_arrivals.sort_by(|a, b| b.id.cmp(&a.id));
        new_arrivals.truncate(HIGHLIGHT_LIMIT);
    }

    let mut best_sellers = tagged(shoes, "bestseller");
    if best_sellers.is_empty() {
        best_sellers = shoes.to_vec();
        best_sellers.sort_by(|a, b| b.reviews.cmp(&a.reviews));
        best_sellers.truncate(HIGHLIGHT_LIMIT);
    }

    let mut seen = HashSet::new();
    let gallery = shoes
        .iter()
        .map(|s| s.image.trim())
        .filter(|image| !image.is_empty() && seen.insert(*image))
        .take(HIGHLIGHT_LIMIT)
        .map(str::to_owned)
        .collect();

    Highlights {
        featured,
        new_arrivals,
        best_sellers,
        gallery,
    }
}

fn tagged(shoes: &[Shoe], tag: &str) -> Vec<Shoe> {
    shoes
        .iter()
        .filter(|s| s.has_tag(tag))
        .take(HIGHLIGHT_LIMIT)
        .cloned()
        .collect()
}

/// One selectable filter value with the number of matching shoes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetEntry {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Filter options for the catalog sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub categories: Vec<FacetEntry>,
    pub brands: Vec<FacetEntry>,
}

/// Count shoes per category and per brand.
///
/// Both lists start with an `"all"` entry. Brands are grouped
/// case-insensitively, keep the first spelling seen and are sorted by name.
#[must_use]
pub fn facets(shoes: &[Shoe]) -> Facets {
    let mut categories = vec![FacetEntry {
        id: ALL.to_owned(),
        name: "All Shoes".to_owned(),
        count: shoes.len(),
    }];
    categories.extend(Category::ALL.into_iter().map(|category| FacetEntry {
        id: category.as_str().to_owned(),
        name: category.display_name().to_owned(),
        count: shoes.iter().filter(|s| s.category == category).count(),
    }));

    let mut by_brand: BTreeMap<String, FacetEntry> = BTreeMap::new();
    for shoe in shoes {
        let name = shoe.brand.trim();
        if name.is_empty() {
            continue;
        }
        let id = name.to_lowercase();
        by_brand
            .entry(id.clone())
            .or_insert_with(|| FacetEntry {
                id,
                name: name.to_owned(),
                count: 0,
            })
            .count += 1;
    }

    let mut brands = vec![FacetEntry {
        id: ALL.to_owned(),
        name: "All Brands".to_owned(),
        count: shoes.len(),
    }];
    brands.extend(by_brand.into_values());

    Facets { categories, brands }
}

/// Look up `ids` in `shoes`, keeping the order of `ids`.
///
/// Unknown ids are skipped; at most `limit` shoes are returned.
#[must_use]
pub fn resolve_ids(shoes: &[Shoe], ids: &[ShoeId], limit: usize) -> Vec<Shoe> {
    ids.iter()
        .filter_map(|id| shoes.iter().find(|s| s.id == *id))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;

    pub(crate) fn shoe(id: i32, name: &str, brand: &str, category: Category, price: &str) -> Shoe {
        let now = Utc::now();
        Shoe {
            id: ShoeId::new(id),
            name: name.to_owned(),
            brand: brand.to_owned(),
            category,
            description: String::new(),
            price: Price::parse(price).unwrap(),
            original_price: None,
            image: format!("/uploads/shoe-{id}.jpg"),
            sizes: vec!["8".to_owned(), "9".to_owned(), "10.5".to_owned()],
            colors: vec!["Black".to_owned(), "White".to_owned()],
            tags: Vec::new(),
            rating: Decimal::new(40, 1),
            reviews: 0,
            stock: 10,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog() -> Vec<Shoe> {
        vec![
            shoe(1, "Air Zoom Pegasus", "Nike", Category::Running, "120"),
            shoe(2, "Stan Smith", "Adidas", Category::Casual, "90"),
            shoe(3, "Old Skool", "Vans", Category::Skate, "70"),
            shoe(4, "Chuck 70", "Converse", Category::Lifestyle, "85"),
            shoe(5, "Ultraboost", "adidas", Category::Running, "180"),
        ]
    }

    fn ids(shoes: &[Shoe]) -> Vec<i32> {
        shoes.iter().map(|s| s.id.as_i32()).collect()
    }

    #[test]
    fn test_all_filters_are_ignored() {
        let query = CatalogQuery {
            category: Some("all".to_owned()),
            brand: Some("All".to_owned()),
            search: Some("  ".to_owned()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&catalog(), &query)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_search_matches_name_brand_or_category() {
        let by_name = CatalogQuery {
            search: Some("skool".to_owned()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&catalog(), &by_name)), vec![3]);

        let by_brand = CatalogQuery {
            search: Some("ADIDAS".to_owned()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&catalog(), &by_brand)), vec![2, 5]);

        let by_category = CatalogQuery {
            search: Some("run".to_owned()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&catalog(), &by_category)), vec![1, 5]);
    }

    #[test]
    fn test_category_brand_and_price_filters() {
        let query = CatalogQuery {
            category: Some("Running".to_owned()),
            brand: Some("adidas".to_owned()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&catalog(), &query)), vec![5]);

        let range = CatalogQuery {
            min_price: Some(Price::parse("85").unwrap()),
            max_price: Some(Price::parse("120").unwrap()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&catalog(), &range)), vec![1, 2, 4]);
    }

    #[test]
    fn test_size_filter_compares_numerically() {
        let mut shoes = catalog();
        shoes[2].sizes = vec!["11".to_owned()];
        let query = CatalogQuery {
            sizes: vec!["9.0".to_owned(), "11".to_owned()],
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&shoes, &query)), vec![1, 2, 3, 4, 5]);

        let query = CatalogQuery {
            sizes: vec!["11".to_owned()],
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&shoes, &query)), vec![3]);
        assert!(sizes_match("XL", "xl"));
    }

    #[test]
    fn test_sort_orders() {
        let mut query = CatalogQuery {
            sort: SortOrder::PriceLow,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&catalog(), &query)), vec![3, 4, 2, 1, 5]);

        query.sort = SortOrder::PriceHigh;
        assert_eq!(ids(&filter_and_sort(&catalog(), &query)), vec![5, 1, 2, 4, 3]);

        query.sort = SortOrder::Newest;
        assert_eq!(ids(&filter_and_sort(&catalog(), &query)), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_rating_sort_is_stable() {
        let mut shoes = catalog();
        shoes[3].rating = Decimal::new(48, 1);
        let query = CatalogQuery {
            sort: SortOrder::Rating,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&shoes, &query)), vec![4, 1, 2, 3, 5]);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("price-low".parse::<SortOrder>().unwrap(), SortOrder::PriceLow);
        assert_eq!("".parse::<SortOrder>().unwrap(), SortOrder::Featured);
        assert!("cheapest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_highlights_fall_back_without_tags() {
        let mut shoes = catalog();
        shoes[1].reviews = 300;
        shoes[3].reviews = 120;
        shoes[0].featured = true;
        shoes[4].image = shoes[0].image.clone();

        let strips = highlights(&shoes);
        assert_eq!(ids(&strips.featured), vec![1]);
        assert_eq!(ids(&strips.new_arrivals), vec![5, 4, 3, 2, 1]);
        assert_eq!(ids(&strips.best_sellers)[..2], [2, 4]);
        assert_eq!(strips.gallery.len(), 4);
    }

    #[test]
    fn test_highlights_prefer_tags() {
        let mut shoes = catalog();
        shoes[2].tags = vec!["New".to_owned()];
        shoes[1].tags = vec!["bestseller".to_owned(), "featured".to_owned()];

        let strips = highlights(&shoes);
        assert_eq!(ids(&strips.new_arrivals), vec![3]);
        assert_eq!(ids(&strips.best_sellers), vec![2]);
        assert_eq!(ids(&strips.featured), vec![2]);
    }

    #[test]
    fn test_facets_count_categories_and_brands() {
        let facets = facets(&catalog());

        assert_eq!(facets.categories.len(), 1 + Category::ALL.len());
        assert_eq!(facets.categories[0].count, 5);
        let running = facets.categories.iter().find(|c| c.id == "running").unwrap();
        assert_eq!(running.count, 2);

        let brand_ids: Vec<&str> = facets.brands.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(brand_ids, vec!["all", "adidas", "converse", "nike", "vans"]);
        assert_eq!(facets.brands[1].name, "Adidas");
        assert_eq!(facets.brands[1].count, 2);
    }

    #[test]
    fn test_resolve_ids_keeps_order_and_skips_unknown() {
        let ids_in = [ShoeId::new(4), ShoeId::new(99), ShoeId::new(1), ShoeId::new(2)];
        assert_eq!(ids(&resolve_ids(&catalog(), &ids_in, 2)), vec![4, 1]);
    }
}
