//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::categories::CategoriesServiceError;

pub(crate) fn into_status_error(error: CategoriesServiceError) -> StatusError {
    match error {
        CategoriesServiceError::AlreadyExists => {
            StatusError::conflict().brief("A sibling category already uses this slug")
        }
        CategoriesServiceError::NotFound => StatusError::not_found().brief("Category not found"),
        CategoriesServiceError::InvalidReference => {
            StatusError::bad_request().brief("Parent category or top product does not exist")
        }
        CategoriesServiceError::MissingRequiredData
        | CategoriesServiceError::InvalidData
        | CategoriesServiceError::InvalidSlug(_) => {
            StatusError::bad_request().brief("Invalid category payload")
        }
        CategoriesServiceError::InvalidMove => StatusError::unprocessable_entity()
            .brief("A category cannot be moved under itself or one of its descendants"),
        CategoriesServiceError::Sql(source) => {
            error!("category storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
