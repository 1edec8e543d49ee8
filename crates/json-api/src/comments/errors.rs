//! Comment Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::comments::CommentsServiceError;

pub(crate) fn into_status_error(error: CommentsServiceError) -> StatusError {
    match error {
        CommentsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Comment already exists")
        }
        CommentsServiceError::NotFound => StatusError::not_found().brief("Comment not found"),
        CommentsServiceError::ProductNotFound => {
            StatusError::not_found().brief("Product not found")
        }
        CommentsServiceError::InvalidReference
        | CommentsServiceError::MissingRequiredData
        | CommentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid comment payload")
        }
        CommentsServiceError::Sql(source) => {
            error!("comment storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
