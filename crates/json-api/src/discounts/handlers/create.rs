//! Create Discount Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::discounts::data::NewDiscount;

use crate::{
    discounts::{errors::into_status_error, get::DiscountResponse},
    extensions::*,
    state::State,
};

/// Create Discount Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateDiscountRequest {
    pub uuid: Uuid,

    /// Percentage off, within `0..=100`
    pub discount: f64,

    #[serde(default)]
    pub description: String,
}

impl From<CreateDiscountRequest> for NewDiscount {
    fn from(request: CreateDiscountRequest) -> Self {
        NewDiscount {
            uuid: request.uuid.into(),
            discount: request.discount,
            description: request.description,
        }
    }
}

/// Create Discount Handler
#[endpoint(
    tags("discounts"),
    summary = "Create Discount",
    responses(
        (status_code = StatusCode::CREATED, description = "Discount created"),
        (status_code = StatusCode::CONFLICT, description = "Discount already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateDiscountRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DiscountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let discount = state
        .app
        .discounts
        .create_discount(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/discounts/{}", discount.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(discount.into()))
}
