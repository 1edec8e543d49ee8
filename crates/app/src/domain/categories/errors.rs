//! Categories service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{categories::TreeError, slugs::SlugError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategoriesServiceError {
    #[error("category already exists")]
    AlreadyExists,

    #[error("category not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("a category cannot be moved under itself or one of its descendants")]
    InvalidMove,

    #[error("invalid slug")]
    InvalidSlug(#[from] SlugError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CategoriesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<TreeError> for CategoriesServiceError {
    fn from(error: TreeError) -> Self {
        match error {
            TreeError::DuplicateCategory => Self::AlreadyExists,
            TreeError::UnknownCategory => Self::NotFound,
            TreeError::UnknownParent => Self::InvalidReference,
            TreeError::InvalidMove => Self::InvalidMove,
            TreeError::Cycle => Self::InvalidData,
        }
    }
}
