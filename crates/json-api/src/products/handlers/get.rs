//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::records::{ProductDetails, ProductRecord};

use crate::{
    comments::index::CommentResponse, extensions::*, products::errors::into_status_error,
    state::State,
};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub name: String,

    /// URL slug, unique across products
    pub slug: String,

    /// Unit price in minor units
    pub unit_price: u64,

    pub description: String,
    pub short_description: String,

    /// Units in stock
    pub inventory: u32,

    /// Inactive products are hidden from listings and cannot be added to carts
    pub is_active: bool,

    /// Cover image reference
    pub cover: Option<String>,

    pub categories: Vec<Uuid>,
    pub discounts: Vec<Uuid>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            uuid: product.uuid.into(),
            name: product.name,
            slug: product.slug,
            unit_price: product.unit_price,
            description: product.description,
            short_description: product.short_description,
            inventory: product.inventory,
            is_active: product.is_active,
            cover: product.cover,
            categories: product.categories.into_iter().map(Into::into).collect(),
            discounts: product.discounts.into_iter().map(Into::into).collect(),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Product Details Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductDetailsResponse {
    #[serde(flatten)]
    pub product: ProductResponse,

    /// Approved comments, oldest first
    pub comments: Vec<CommentResponse>,
}

impl From<ProductDetails> for ProductDetailsResponse {
    fn from(details: ProductDetails) -> Self {
        Self {
            product: details.product.into(),
            comments: details.comments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product with its approved comments.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let details = state
        .app
        .products
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(details.into()))
}
