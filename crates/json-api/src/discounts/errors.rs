//! Discount Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::discounts::DiscountsServiceError;

pub(crate) fn into_status_error(error: DiscountsServiceError) -> StatusError {
    match error {
        DiscountsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Discount already exists")
        }
        DiscountsServiceError::NotFound => StatusError::not_found().brief("Discount not found"),
        DiscountsServiceError::MissingRequiredData | DiscountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Discount must be a percentage between 0 and 100")
        }
        DiscountsServiceError::Sql(source) => {
            error!("discount storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
