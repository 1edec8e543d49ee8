//! Update Product Handler

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

use storefront_app::domain::products::data::ProductUpdate;

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Update Product Request
///
/// Replaces every field and relation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub name: String,

    /// Keeps the stored slug when absent
    #[serde(default)]
    pub slug: Option<String>,

    pub unit_price: u64,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub short_description: String,

    pub inventory: u32,
    pub is_active: bool,

    #[serde(default)]
    pub cover: Option<String>,

    #[serde(default)]
    pub categories: Vec<Uuid>,

    #[serde(default)]
    pub discounts: Vec<Uuid>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: request.name,
            slug: request.slug,
            unit_price: request.unit_price,
            description: request.description,
            short_description: request.short_description,
            inventory: request.inventory,
            is_active: request.is_active,
            cover: request.cover,
            categories: request.categories.into_iter().map(Into::into).collect(),
            discounts: request.discounts.into_iter().map(Into::into).collect(),
        }
    }
}

/// Product Update Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot),
    fields(
        product_uuid = tracing::field::Empty,
        unit_price = tracing::field::Empty,
        categories_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let product = product.into_inner();

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(product));
    span.record("unit_price", request.unit_price);
    span.record("categories_count", request.categories.len());

    let updated = state
        .app
        .products
        .update_product(product.into(), request.into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product, unit_price = updated.unit_price, "updated product");

    Ok(Json(updated.into()))
}
