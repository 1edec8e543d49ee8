//! Product Comments Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::comments::records::CommentRecord;

use crate::{
    comments::{ModerationStatus, errors::into_status_error},
    extensions::*,
    state::State,
};

/// Comment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CommentResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,

    /// Author name
    pub name: String,
    pub body: String,
    pub status: ModerationStatus,
    pub created_at: String,
}

impl From<CommentRecord> for CommentResponse {
    fn from(comment: CommentRecord) -> Self {
        Self {
            uuid: comment.uuid.into(),
            product_uuid: comment.product_uuid.into(),
            name: comment.name,
            body: comment.body,
            status: comment.status.into(),
            created_at: comment.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CommentsResponse {
    /// Approved comments, oldest first
    pub comments: Vec<CommentResponse>,
}

/// Product Comments Index Handler
#[endpoint(
    tags("comments"),
    summary = "List Approved Comments",
    responses(
        (status_code = StatusCode::OK, description = "Approved comments"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CommentsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let comments = state
        .app
        .comments
        .list_approved_comments(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CommentsResponse {
        comments: comments.into_iter().map(Into::into).collect(),
    }))
}
