//! Update Order Status Handler

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

use crate::{
    extensions::*,
    orders::{PaymentStatus, errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    pub status: PaymentStatus,
}

/// Update Order Status Handler
///
/// Unpaid orders may become paid or canceled; paid orders may only be canceled.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    responses(
        (status_code = StatusCode::OK, description = "Order status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Transition not allowed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_status",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty, status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = order.into_inner();
    let status = json.into_inner().status;

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));
    span.record("status", tracing::field::debug(status));

    let order = state
        .app
        .orders
        .update_status(order.into(), status.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront::orders::{OrderStatus, StatusTransitionError};
    use storefront_app::domain::{
        customers::records::CustomerUuid,
        orders::{MockOrdersService, OrdersServiceError, records::OrderUuid},
    };

    use crate::test_helpers::{make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders/{order}").patch(handler))
    }

    #[tokio::test]
    async fn test_mark_order_paid() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_update_status()
            .once()
            .withf(move |u, status| *u == uuid && *status == OrderStatus::Paid)
            .return_once(move |_, status| {
                let mut order = make_order(uuid, CustomerUuid::new());
                order.status = status;

                Ok(order)
            });

        let response: OrderResponse =
            TestClient::patch(format!("http://example.com/orders/{uuid}"))
                .json(&json!({ "status": "paid" }))
                .send(&make_service(orders))
                .await
                .take_json()
                .await?;

        assert_eq!(response.status, PaymentStatus::Paid);

        Ok(())
    }

    #[tokio::test]
    async fn test_reopening_canceled_order_returns_422() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_update_status().once().return_once(|_, _| {
            Err(OrdersServiceError::InvalidTransition(StatusTransitionError {
                from: OrderStatus::Canceled,
                to: OrderStatus::Unpaid,
            }))
        });

        let res = TestClient::patch(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .json(&json!({ "status": "unpaid" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_update_status().never();

        let res = TestClient::patch(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .json(&json!({ "status": "shipped" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
