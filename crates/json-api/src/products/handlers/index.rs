//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront::search::{Page, PriceRange, normalize_query};
use storefront_app::domain::products::{data::ProductSearch, records::ProductPage};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// Products on this page
    pub products: Vec<ProductResponse>,

    /// Matching products across all pages
    pub total: u64,

    /// 1-based page number
    pub page: u32,

    pub per_page: u32,

    /// Number of pages, at least 1
    pub pages: u64,
}

impl From<ProductPage> for ProductsResponse {
    fn from(page: ProductPage) -> Self {
        Self {
            pages: page.page.count(page.total),
            page: page.page.number(),
            per_page: page.page.size(),
            total: page.total,
            products: page.products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Product Index Handler
///
/// Searches active products by text, category subtree and price range.
#[endpoint(
    tags("products"),
    summary = "Search Products",
    responses(
        (status_code = StatusCode::OK, description = "Matching products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid filters"),
    ),
)]
pub(crate) async fn handler(
    q: QueryParam<String, false>,
    category: QueryParam<Uuid, false>,
    min_price: QueryParam<u64, false>,
    max_price: QueryParam<u64, false>,
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let search = ProductSearch {
        query: normalize_query(q.into_inner().as_deref()),
        category: category.into_inner().map(Into::into),
        price: PriceRange::new(min_price.into_inner(), max_price.into_inner())
            .or_400("invalid price range")?,
        page: Page::new(page.into_inner(), per_page.into_inner()).or_400("invalid page")?,
    };

    let page = state
        .app
        .products
        .search_products(search)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
