//! Add Cart Item Handler

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

use storefront::carts::{AddMode, Quantity};
use storefront_app::domain::carts::data::NewCartItem;

use crate::{
    carts::{errors::into_status_error, get::CartItemResponse},
    extensions::*,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// Identifier for the line if the product is not in the cart yet
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    /// Units to add, between 1 and 30
    pub quantity: i64,

    /// Overwrite the line quantity instead of adding to it
    #[serde(default)]
    pub replace: bool,
}

/// Add Cart Item Handler
///
/// Adds a product to the cart, merging with an existing line for the same product.
#[endpoint(
    tags("carts"),
    summary = "Add Cart Item",
    responses(
        (status_code = StatusCode::CREATED, description = "Cart line written"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::CONFLICT, description = "Line uuid already in use"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = cart.into_inner();
    let request = json.into_inner();

    let item = NewCartItem {
        uuid: request.uuid.into(),
        product_uuid: request.product_uuid.into(),
        quantity: Quantity::new(request.quantity).or_400("invalid quantity")?,
        mode: AddMode::from_replace(request.replace),
    };

    let written = state
        .app
        .carts
        .add_item(cart.into(), item)
        .await
        .map_err(into_status_error)?;

    res.add_header(
        LOCATION,
        format!("/carts/{cart}/items/{}", written.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(written.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        carts::{
            CartsServiceError, MockCartsService,
            records::{CartItemUuid, CartUuid},
        },
        products::records::ProductUuid,
    };

    use crate::test_helpers::{carts_service, make_cart_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("carts/{cart}/items").post(handler))
    }

    #[tokio::test]
    async fn test_add_item_defaults_to_increment() -> TestResult {
        let cart = CartUuid::new();
        let item = CartItemUuid::new();
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |c, new| {
                *c == cart
                    && new.uuid == item
                    && new.product_uuid == product
                    && new.quantity.get() == 3
                    && new.mode == AddMode::Increment
            })
            .return_once(move |_, _| Ok(make_cart_item(item, 3)));

        let mut res = TestClient::post(format!("http://example.com/carts/{cart}/items"))
            .json(&json!({
                "uuid": item.into_uuid(),
                "product_uuid": product.into_uuid(),
                "quantity": 3,
            }))
            .send(&make_service(carts))
            .await;

        let body: CartItemResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            location,
            Some(format!("/carts/{cart}/items/{item}").as_str())
        );
        assert_eq!(body.quantity, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_replace_flag_sets_mode() -> TestResult {
        let item = CartItemUuid::new();
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(|_, new| new.mode == AddMode::Replace)
            .return_once(move |_, _| Ok(make_cart_item(item, 1)));

        let res = TestClient::post(format!("http://example.com/carts/{}/items", Uuid::now_v7()))
            .json(&json!({
                "uuid": item.into_uuid(),
                "product_uuid": Uuid::now_v7(),
                "quantity": 1,
                "replace": true,
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_out_of_range_quantity_returns_400() -> TestResult {
        for quantity in [0, 31, -4] {
            let mut carts = MockCartsService::new();

            carts.expect_add_item().never();

            let res =
                TestClient::post(format!("http://example.com/carts/{}/items", Uuid::now_v7()))
                    .json(&json!({
                        "uuid": Uuid::now_v7(),
                        "product_uuid": Uuid::now_v7(),
                        "quantity": quantity,
                    }))
                    .send(&make_service(carts))
                    .await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::BAD_REQUEST),
                "quantity {quantity} should be rejected"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_add_inactive_product_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ProductNotFound));

        let res = TestClient::post(format!("http://example.com/carts/{}/items", Uuid::now_v7()))
            .json(&json!({
                "uuid": Uuid::now_v7(),
                "product_uuid": Uuid::now_v7(),
                "quantity": 2,
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
