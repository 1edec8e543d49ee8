//! Comments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::orders::CommentStatus;

use crate::domain::{
    comments::records::{CommentRecord, CommentUuid},
    products::records::ProductUuid,
};

const LIST_APPROVED_COMMENTS_SQL: &str = include_str!("sql/list_approved_comments.sql");
const CREATE_COMMENT_SQL: &str = include_str!("sql/create_comment.sql");
const UPDATE_COMMENT_STATUS_SQL: &str = include_str!("sql/update_comment_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCommentsRepository;

impl PgCommentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_approved_comments(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<CommentRecord>, sqlx::Error> {
        query_as::<Postgres, CommentRecord>(LIST_APPROVED_COMMENTS_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_comment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        comment: CommentUuid,
        product: ProductUuid,
        name: &str,
        body: &str,
    ) -> Result<CommentRecord, sqlx::Error> {
        query_as::<Postgres, CommentRecord>(CREATE_COMMENT_SQL)
            .bind(comment.into_uuid())
            .bind(product.into_uuid())
            .bind(name)
            .bind(body)
            .bind(CommentStatus::default().code())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        comment: CommentUuid,
        status: CommentStatus,
    ) -> Result<CommentRecord, sqlx::Error> {
        query_as::<Postgres, CommentRecord>(UPDATE_COMMENT_STATUS_SQL)
            .bind(comment.into_uuid())
            .bind(status.code())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CommentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = CommentStatus::from_code(&status).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: CommentUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            body: row.try_get("body")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
