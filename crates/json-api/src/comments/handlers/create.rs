//! Create Comment Handler

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

use storefront_app::domain::comments::data::NewComment;

use crate::{
    comments::{errors::into_status_error, index::CommentResponse},
    extensions::*,
    state::State,
};

/// Create Comment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCommentRequest {
    pub uuid: Uuid,

    /// Author name, may be left out
    #[serde(default)]
    pub name: String,
    pub body: String,
}

/// Create Comment Handler
///
/// New comments wait for moderation before they are listed.
#[endpoint(
    tags("comments"),
    summary = "Submit Comment",
    responses(
        (status_code = StatusCode::CREATED, description = "Comment submitted"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<CreateCommentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CommentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let comment = state
        .app
        .comments
        .create_comment(NewComment {
            uuid: request.uuid.into(),
            product_uuid: product.into_inner().into(),
            name: request.name,
            body: request.body,
        })
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(comment.into()))
}
