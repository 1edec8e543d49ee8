//! Get Discount Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::discounts::records::DiscountRecord;

use crate::{discounts::errors::into_status_error, extensions::*, state::State};

/// Discount Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountResponse {
    pub uuid: Uuid,

    /// Percentage off
    pub discount: f64,
    pub description: String,
    pub created_at: String,
}

impl From<DiscountRecord> for DiscountResponse {
    fn from(discount: DiscountRecord) -> Self {
        Self {
            uuid: discount.uuid.into(),
            discount: discount.discount,
            description: discount.description,
            created_at: discount.created_at.to_string(),
        }
    }
}

/// Get Discount Handler
#[endpoint(
    tags("discounts"),
    summary = "Get Discount",
    responses(
        (status_code = StatusCode::OK, description = "Discount found"),
        (status_code = StatusCode::NOT_FOUND, description = "Discount not found"),
    ),
)]
pub(crate) async fn handler(
    discount: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<DiscountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let discount = state
        .app
        .discounts
        .get_discount(discount.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(discount.into()))
}
