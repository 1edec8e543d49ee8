//! Get Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::records::{CartItemRecord, CartProduct, CartRecord};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The cart token
    pub uuid: Uuid,

    /// The items in the cart, oldest first
    pub items: Vec<CartItemResponse>,

    /// Sum of line subtotals
    pub total: u64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        CartResponse {
            uuid: cart.uuid.into(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            total: cart.total,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// The live product behind a cart line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartProductResponse {
    pub uuid: Uuid,
    pub name: String,
    pub slug: String,

    /// Current unit price, which may differ from the line price
    pub unit_price: u64,
    pub is_active: bool,
}

impl From<CartProduct> for CartProductResponse {
    fn from(product: CartProduct) -> Self {
        Self {
            uuid: product.uuid.into(),
            name: product.name,
            slug: product.slug,
            unit_price: product.unit_price,
            is_active: product.is_active,
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    pub product: CartProductResponse,

    pub quantity: u16,

    /// Unit price captured when the line was created
    pub unit_price: u64,

    /// `quantity * unit_price`
    pub subtotal: u64,

    /// The date and time the item was created
    pub created_at: String,

    /// The date and time the item was last updated
    pub updated_at: String,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(cart_item: CartItemRecord) -> Self {
        Self {
            uuid: cart_item.uuid.into(),
            product: cart_item.product.into(),
            quantity: cart_item.quantity,
            unit_price: cart_item.unit_price,
            subtotal: cart_item.subtotal,
            created_at: cart_item.created_at.to_string(),
            updated_at: cart_item.updated_at.to_string(),
        }
    }
}

/// Get Cart Handler
///
/// Returns a cart with its lines and total.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart found"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .get_cart(cart.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
