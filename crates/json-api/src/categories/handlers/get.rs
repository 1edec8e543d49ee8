//! Get Category Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::categories::records::{CategoryDetails, CategoryRecord};

use crate::{
    categories::errors::into_status_error, extensions::*, products::get::ProductResponse,
    state::State,
};

/// Category Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    /// The unique identifier of the category
    pub uuid: Uuid,

    /// Display title
    pub title: String,

    /// URL slug, unique among siblings
    pub slug: String,

    pub description: String,

    /// Parent category, absent for roots
    pub parent_uuid: Option<Uuid>,

    /// Featured product
    pub top_product_uuid: Option<Uuid>,

    /// Depth below the root (roots are level 0)
    pub level: u32,

    /// The date and time the category was created
    pub created_at: String,

    /// The date and time the category was last updated
    pub updated_at: String,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(category: CategoryRecord) -> Self {
        Self {
            uuid: category.uuid.into(),
            title: category.title,
            slug: category.slug,
            description: category.description,
            parent_uuid: category.parent_uuid.map(Into::into),
            top_product_uuid: category.top_product_uuid.map(Into::into),
            level: category.bounds.level,
            created_at: category.created_at.to_string(),
            updated_at: category.updated_at.to_string(),
        }
    }
}

/// Category Details Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryDetailsResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,

    /// Titles from the root down, joined with `>`
    pub full_path: String,

    /// Ancestors, root first
    pub ancestors: Vec<CategoryResponse>,

    /// Descendants in tree order
    pub descendants: Vec<CategoryResponse>,

    /// Active products filed anywhere in the subtree
    pub products: Vec<ProductResponse>,
}

impl From<CategoryDetails> for CategoryDetailsResponse {
    fn from(details: CategoryDetails) -> Self {
        Self {
            category: details.category.into(),
            full_path: details.full_path,
            ancestors: details.ancestors.into_iter().map(Into::into).collect(),
            descendants: details.descendants.into_iter().map(Into::into).collect(),
            products: details.products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get Category Handler
///
/// Returns a category with its lineage and products.
#[endpoint(
    tags("categories"),
    summary = "Get Category",
    responses(
        (status_code = StatusCode::OK, description = "Category found"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    category: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CategoryDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let details = state
        .app
        .categories
        .get_category(category.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(details.into()))
}
