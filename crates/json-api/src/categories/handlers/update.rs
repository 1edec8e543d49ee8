//! Update Category Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::categories::data::CategoryUpdate;

use crate::{
    categories::{errors::into_status_error, get::CategoryResponse},
    extensions::*,
    state::State,
};

/// Update Category Request
///
/// Replaces every field. Changing `parent_uuid` moves the category with its subtree.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCategoryRequest {
    pub title: String,

    /// Keeps the stored slug when absent
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub parent_uuid: Option<Uuid>,

    #[serde(default)]
    pub top_product_uuid: Option<Uuid>,
}

impl From<UpdateCategoryRequest> for CategoryUpdate {
    fn from(request: UpdateCategoryRequest) -> Self {
        CategoryUpdate {
            title: request.title,
            slug: request.slug,
            description: request.description,
            parent: request.parent_uuid.map(Into::into),
            top_product: request.top_product_uuid.map(Into::into),
        }
    }
}

/// Update Category Handler
#[endpoint(
    tags("categories"),
    summary = "Update Category",
    responses(
        (status_code = StatusCode::OK, description = "Category updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
        (status_code = StatusCode::CONFLICT, description = "Slug already used by a sibling"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Move into own subtree"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "categories.update",
    skip(category, json, depot),
    fields(category_uuid = tracing::field::Empty, parent_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    category: PathParam<Uuid>,
    json: JsonBody<UpdateCategoryRequest>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let category = category.into_inner();
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("category_uuid", tracing::field::display(category));

    if let Some(parent) = request.parent_uuid {
        span.record("parent_uuid", tracing::field::display(parent));
    }

    let updated = state
        .app
        .categories
        .update_category(category.into(), request.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}
