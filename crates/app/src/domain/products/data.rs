//! Products Data

use storefront::search::{Page, PriceRange};

use crate::domain::{
    categories::records::CategoryUuid, discounts::records::DiscountUuid,
    products::records::ProductUuid,
};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,

    /// Explicit slug; derived from `name` when `None`.
    pub slug: Option<String>,
    pub unit_price: u64,
    pub description: String,
    pub short_description: String,
    pub inventory: u32,
    pub is_active: bool,
    pub cover: Option<String>,
    pub categories: Vec<CategoryUuid>,
    pub discounts: Vec<DiscountUuid>,
}

/// Product Update Data
///
/// Replaces every field. A `None` slug keeps the stored one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub slug: Option<String>,
    pub unit_price: u64,
    pub description: String,
    pub short_description: String,
    pub inventory: u32,
    pub is_active: bool,
    pub cover: Option<String>,
    pub categories: Vec<CategoryUuid>,
    pub discounts: Vec<DiscountUuid>,
}

/// Product Search Filters
///
/// Only active products are ever returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSearch {
    /// Case-insensitive match on name, description or short description.
    pub query: Option<String>,
    pub category: Option<CategoryUuid>,
    pub price: PriceRange,
    pub page: Page,
}
