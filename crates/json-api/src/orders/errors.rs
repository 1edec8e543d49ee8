//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::CartNotFound => StatusError::not_found().brief("Cart not found"),
        OrdersServiceError::CustomerNotFound => {
            StatusError::not_found().brief("Customer not found")
        }
        OrdersServiceError::EmptyCart => StatusError::unprocessable_entity().brief("Cart is empty"),
        OrdersServiceError::InvalidTransition(source) => StatusError::unprocessable_entity()
            .brief("Order status cannot change")
            .detail(source.to_string()),
        OrdersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Invalid order reference")
        }
        OrdersServiceError::MissingRequiredData | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
