//! Moderate Comment Handler

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
    comments::{ModerationStatus, errors::into_status_error, index::CommentResponse},
    extensions::*,
    state::State,
};

/// Moderate Comment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ModerateCommentRequest {
    pub status: ModerationStatus,
}

/// Moderate Comment Handler
#[endpoint(
    tags("comments"),
    summary = "Moderate Comment",
    responses(
        (status_code = StatusCode::OK, description = "Comment moderated"),
        (status_code = StatusCode::NOT_FOUND, description = "Comment not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    comment: PathParam<Uuid>,
    json: JsonBody<ModerateCommentRequest>,
    depot: &mut Depot,
) -> Result<Json<CommentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let comment = state
        .app
        .comments
        .moderate_comment(comment.into_inner().into(), json.into_inner().status.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(comment.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront::orders::CommentStatus;
    use testresult::TestResult;

    use storefront_app::domain::{
        comments::{CommentsServiceError, MockCommentsService, records::CommentUuid},
        products::records::ProductUuid,
    };

    use crate::test_helpers::{comments_service, make_comment};

    use super::*;

    fn make_service(comments: MockCommentsService) -> Service {
        comments_service(comments, Router::with_path("comments/{comment}").patch(handler))
    }

    #[tokio::test]
    async fn test_moderate_comment_success() -> TestResult {
        let uuid = CommentUuid::new();

        let mut comment = make_comment(uuid, ProductUuid::new());
        comment.status = CommentStatus::NotApproved;

        let mut comments = MockCommentsService::new();

        comments
            .expect_moderate_comment()
            .once()
            .withf(move |u, status| *u == uuid && *status == CommentStatus::NotApproved)
            .return_once(move |_, _| Ok(comment));

        let mut res = TestClient::patch(format!("http://example.com/comments/{uuid}"))
            .json(&json!({ "status": "not-approved" }))
            .send(&make_service(comments))
            .await;

        let body: CommentResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, ModerationStatus::NotApproved);

        Ok(())
    }

    #[tokio::test]
    async fn test_moderate_unknown_status_returns_400() -> TestResult {
        let mut comments = MockCommentsService::new();

        comments.expect_moderate_comment().never();

        let res = TestClient::patch(format!("http://example.com/comments/{}", Uuid::now_v7()))
            .json(&json!({ "status": "maybe" }))
            .send(&make_service(comments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_moderate_missing_comment_returns_404() -> TestResult {
        let mut comments = MockCommentsService::new();

        comments
            .expect_moderate_comment()
            .once()
            .return_once(|_, _| Err(CommentsServiceError::NotFound));

        let res = TestClient::patch(format!("http://example.com/comments/{}", Uuid::now_v7()))
            .json(&json!({ "status": "approved" }))
            .send(&make_service(comments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
