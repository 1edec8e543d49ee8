//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::{debug, error};

/// Map errors to HTTP errors at the handler boundary.
pub(crate) trait ResultExt<T> {
    /// Log the error and answer 500.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// Answer 400 with `brief` as the message.
    fn or_400(self, brief: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self, brief: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            debug!("{brief}: {error}");

            StatusError::bad_request().brief(brief).detail(error.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use storefront::search::PriceRange;

    use super::*;

    #[test]
    fn or_400_keeps_the_brief() {
        let result = PriceRange::new(Some(200), Some(100)).or_400("invalid price range");

        let error = result.err();

        assert_eq!(error.as_ref().map(|e| e.code), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            error.map(|e| e.brief),
            Some("invalid price range".to_owned())
        );
    }

    #[test]
    fn or_500_hides_the_cause() {
        let result: Result<(), String> = Err("connection reset".to_owned());

        let error = result.or_500("failed to load cart").err();

        assert_eq!(
            error.map(|e| e.code),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }
}
