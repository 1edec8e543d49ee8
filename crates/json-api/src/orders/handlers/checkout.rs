//! Checkout Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront::orders::notes_fit;
use storefront_app::domain::orders::data::Checkout;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    /// The unique identifier for the new order
    pub uuid: Uuid,

    /// The customer placing the order
    pub customer_uuid: Uuid,

    /// Delivery notes, at most 700 characters
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CheckoutRequest> for Checkout {
    fn from(request: CheckoutRequest) -> Self {
        Checkout {
            uuid: request.uuid.into(),
            customer_uuid: request.customer_uuid.into(),
            notes: request.notes,
        }
    }
}

/// Checkout Handler
///
/// Turns the cart into an unpaid order and empties the cart.
#[endpoint(
    tags("orders"),
    summary = "Checkout Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or customer not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Cart is empty"),
        (status_code = StatusCode::CONFLICT, description = "Order already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner();

    if !request.notes.as_deref().is_none_or(notes_fit) {
        return Err(StatusError::bad_request().brief("Notes are too long"));
    }

    let order = state
        .app
        .orders
        .checkout(cart.into_inner().into(), request.into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
