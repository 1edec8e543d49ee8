//! Comments service.

use async_trait::async_trait;
use mockall::automock;
use storefront::orders::CommentStatus;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        comments::{
            data::NewComment,
            errors::CommentsServiceError,
            records::{CommentRecord, CommentUuid},
            repository::PgCommentsRepository,
        },
        products::{records::ProductUuid, repository::PgProductsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCommentsService {
    db: Db,
    repository: PgCommentsRepository,
    products: PgProductsRepository,
}

impl PgCommentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCommentsRepository::new(),
            products: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl CommentsService for PgCommentsService {
    async fn list_approved_comments(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<CommentRecord>, CommentsServiceError> {
        let mut tx = self.db.begin().await?;

        if !self.products.product_exists(&mut tx, product).await? {
            return Err(CommentsServiceError::ProductNotFound);
        }

        let comments = self
            .repository
            .list_approved_comments(&mut tx, product)
            .await?;

        tx.commit().await?;

        Ok(comments)
    }

    #[tracing::instrument(
        name = "comments.service.create_comment",
        skip(self, comment),
        fields(comment_uuid = %comment.uuid, product_uuid = %comment.product_uuid),
        err
    )]
    async fn create_comment(
        &self,
        comment: NewComment,
    ) -> Result<CommentRecord, CommentsServiceError> {
        let name = comment.name.trim();
        let body = comment.body.trim();

        if body.is_empty() {
            return Err(CommentsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        if !self
            .products
            .product_exists(&mut tx, comment.product_uuid)
            .await?
        {
            return Err(CommentsServiceError::ProductNotFound);
        }

        let created = self
            .repository
            .create_comment(&mut tx, comment.uuid, comment.product_uuid, name, body)
            .await?;

        tx.commit().await?;

        info!(comment_uuid = %created.uuid, "comment awaiting moderation");

        Ok(created)
    }

    #[tracing::instrument(
        name = "comments.service.moderate_comment",
        skip(self),
        fields(comment_uuid = %comment, status = %status),
        err
    )]
    async fn moderate_comment(
        &self,
        comment: CommentUuid,
        status: CommentStatus,
    ) -> Result<CommentRecord, CommentsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_status(&mut tx, comment, status)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait CommentsService: Send + Sync {
    /// Approved comments of a product, oldest first.
    async fn list_approved_comments(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<CommentRecord>, CommentsServiceError>;

    /// Submit a comment; it waits for moderation before it is listed.
    async fn create_comment(
        &self,
        comment: NewComment,
    ) -> Result<CommentRecord, CommentsServiceError>;

    /// Set the moderation status of a comment.
    async fn moderate_comment(
        &self,
        comment: CommentUuid,
        status: CommentStatus,
    ) -> Result<CommentRecord, CommentsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::ProductsService,
        test::{TestContext, helpers::new_product},
    };

    use super::*;

    fn new_comment(product: ProductUuid, body: &str) -> NewComment {
        NewComment {
            uuid: CommentUuid::new(),
            product_uuid: product,
            name: "Sara".to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn new_comments_wait_for_moderation() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product("Mug", 12)).await?;

        let comment = ctx
            .comments
            .create_comment(new_comment(product.uuid, "Lovely mug"))
            .await?;

        let listed = ctx.comments.list_approved_comments(product.uuid).await?;

        assert_eq!(comment.status, CommentStatus::Waiting);
        assert!(listed.is_empty(), "waiting comments are hidden");

        Ok(())
    }

    #[tokio::test]
    async fn approved_comments_are_listed_oldest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product("Mug", 12)).await?;

        let first = ctx
            .comments
            .create_comment(new_comment(product.uuid, "First"))
            .await?;
        let rejected = ctx
            .comments
            .create_comment(new_comment(product.uuid, "Spam"))
            .await?;
        let second = ctx
            .comments
            .create_comment(new_comment(product.uuid, "Second"))
            .await?;

        ctx.comments
            .moderate_comment(second.uuid, CommentStatus::Approved)
            .await?;
        ctx.comments
            .moderate_comment(first.uuid, CommentStatus::Approved)
            .await?;
        ctx.comments
            .moderate_comment(rejected.uuid, CommentStatus::NotApproved)
            .await?;

        let bodies: Vec<String> = ctx
            .comments
            .list_approved_comments(product.uuid)
            .await?
            .into_iter()
            .map(|comment| comment.body)
            .collect();

        assert_eq!(bodies, vec!["First".to_string(), "Second".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn comment_without_name_is_accepted() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product("Mug", 12)).await?;

        let comment = ctx
            .comments
            .create_comment(NewComment {
                name: String::new(),
                ..new_comment(product.uuid, "Great")
            })
            .await?;

        assert_eq!(comment.name, "");
        assert_eq!(comment.body, "Great");
        assert_eq!(comment.status, CommentStatus::Waiting);

        Ok(())
    }

    #[tokio::test]
    async fn blank_body_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product("Mug", 12)).await?;

        let result = ctx
            .comments
            .create_comment(new_comment(product.uuid, "   "))
            .await;

        assert!(
            matches!(result, Err(CommentsServiceError::MissingRequiredData)),
            "expected MissingRequiredData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn comment_on_unknown_product_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .comments
            .create_comment(new_comment(ProductUuid::new(), "Hello"))
            .await;

        assert!(
            matches!(result, Err(CommentsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn moderating_unknown_comment_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .comments
            .moderate_comment(CommentUuid::new(), CommentStatus::Approved)
            .await;

        assert!(
            matches!(result, Err(CommentsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
