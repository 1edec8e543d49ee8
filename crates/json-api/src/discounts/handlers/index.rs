//! Discount Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    discounts::{errors::into_status_error, get::DiscountResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountsResponse {
    /// Discounts, oldest first
    pub discounts: Vec<DiscountResponse>,
}

/// Discount Index Handler
#[endpoint(tags("discounts"), summary = "List Discounts")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<DiscountsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let discounts = state
        .app
        .discounts
        .list_discounts()
        .await
        .map_err(into_status_error)?;

    Ok(Json(DiscountsResponse {
        discounts: discounts.into_iter().map(Into::into).collect(),
    }))
}
