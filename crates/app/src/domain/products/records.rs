//! Product Records

use jiff::Timestamp;
use storefront::search::Page;

use crate::{
    domain::{
        categories::records::CategoryUuid, comments::records::CommentRecord,
        discounts::records::DiscountUuid,
    },
    uuids::TypedUuid,
};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,

    /// Unit price in minor units.
    pub unit_price: u64,
    pub description: String,
    pub short_description: String,
    pub inventory: u32,
    pub is_active: bool,

    /// Opaque image reference.
    pub cover: Option<String>,
    pub categories: Vec<CategoryUuid>,
    pub discounts: Vec<DiscountUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Product with its approved comments, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub product: ProductRecord,
    pub comments: Vec<CommentRecord>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<ProductRecord>,

    /// Matching products across all pages.
    pub total: u64,
    pub page: Page,
}
