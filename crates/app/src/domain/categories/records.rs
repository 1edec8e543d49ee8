//! Category Records

use jiff::Timestamp;
use storefront::categories::NestedSetBounds;

use crate::{
    domain::products::records::{ProductRecord, ProductUuid},
    uuids::TypedUuid,
};

/// Category UUID
pub type CategoryUuid = TypedUuid<CategoryRecord>;

/// Category Record
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub uuid: CategoryUuid,
    pub title: String,

    /// Unique among siblings.
    pub slug: String,
    pub description: String,
    pub parent_uuid: Option<CategoryUuid>,
    pub top_product_uuid: Option<ProductUuid>,
    pub bounds: NestedSetBounds,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A root category with its direct children, for menus.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBranch {
    pub category: CategoryRecord,
    pub children: Vec<CategoryRecord>,
}

/// A category in tree order with its full path.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTreeEntry {
    pub category: CategoryRecord,
    pub full_path: String,
}

/// Category Details
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDetails {
    pub category: CategoryRecord,
    pub full_path: String,

    /// Root first.
    pub ancestors: Vec<CategoryRecord>,

    /// Pre-order.
    pub descendants: Vec<CategoryRecord>,

    /// Active products filed anywhere in the subtree.
    pub products: Vec<ProductRecord>,
}
