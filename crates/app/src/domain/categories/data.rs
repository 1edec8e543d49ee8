//! Category Data

use crate::domain::{categories::records::CategoryUuid, products::records::ProductUuid};

/// New Category Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub title: String,

    /// Explicit slug; derived from `title` when `None`.
    pub slug: Option<String>,
    pub description: String,
    pub parent: Option<CategoryUuid>,
    pub top_product: Option<ProductUuid>,
}

/// Category Update Data
///
/// Replaces every field. A `None` slug keeps the stored one, and a changed `parent` moves
/// the category with its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryUpdate {
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub parent: Option<CategoryUuid>,
    pub top_product: Option<ProductUuid>,
}
