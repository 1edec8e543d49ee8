//! Cart Item Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartItemResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemsResponse {
    pub items: Vec<CartItemResponse>,
}

/// Cart Item Index Handler
#[endpoint(
    tags("carts"),
    summary = "List Cart Items",
    responses(
        (status_code = StatusCode::OK, description = "Cart lines, oldest first"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartItemsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let items = state
        .app
        .carts
        .list_items(cart.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartItemsResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::carts::{
        CartsServiceError, MockCartsService,
        records::{CartItemUuid, CartUuid},
    };

    use crate::test_helpers::{carts_service, make_cart_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("carts/{cart}/items").get(handler))
    }

    #[tokio::test]
    async fn test_index_lists_lines() -> TestResult {
        let cart = CartUuid::new();
        let first = CartItemUuid::new();
        let second = CartItemUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_list_items()
            .once()
            .withf(move |c| *c == cart)
            .return_once(move |_| {
                Ok(vec![make_cart_item(first, 2), make_cart_item(second, 3)])
            });

        let response: CartItemsResponse =
            TestClient::get(format!("http://example.com/carts/{cart}/items"))
                .send(&make_service(carts))
                .await
                .take_json()
                .await?;

        let uuids: Vec<Uuid> = response.items.iter().map(|item| item.uuid).collect();

        assert_eq!(uuids, vec![first.into_uuid(), second.into_uuid()]);
        assert_eq!(response.items.get(1).map(|item| item.subtotal), Some(150));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_missing_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_list_items()
            .once()
            .return_once(|_| Err(CartsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/carts/{}/items", Uuid::now_v7()))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
