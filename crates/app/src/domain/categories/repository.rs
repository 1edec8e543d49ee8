//! Categories Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use storefront::categories::NestedSetBounds;
use uuid::Uuid;

use crate::{
    database::{to_i32, try_get_u32},
    domain::{
        categories::{
            data::{CategoryUpdate, NewCategory},
            records::{CategoryRecord, CategoryUuid},
        },
        products::records::ProductUuid,
    },
};

const LOCK_CATEGORIES_SQL: &str = include_str!("sql/lock_categories.sql");
const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");
const LIST_MENU_CATEGORIES_SQL: &str = include_str!("sql/list_menu_categories.sql");
const GET_CATEGORY_SQL: &str = include_str!("sql/get_category.sql");
const LIST_ANCESTORS_SQL: &str = include_str!("sql/list_ancestors.sql");
const LIST_DESCENDANTS_SQL: &str = include_str!("sql/list_descendants.sql");
const SIBLING_SLUGS_SQL: &str = include_str!("sql/sibling_slugs.sql");
const CREATE_CATEGORY_SQL: &str = include_str!("sql/create_category.sql");
const UPDATE_CATEGORY_SQL: &str = include_str!("sql/update_category.sql");
const UPDATE_CATEGORY_BOUNDS_SQL: &str = include_str!("sql/update_category_bounds.sql");
const DELETE_CATEGORY_SQL: &str = include_str!("sql/delete_category.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCategoriesRepository;

impl PgCategoriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Serialize structural writes against the whole forest.
    pub(crate) async fn lock_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), sqlx::Error> {
        query(LOCK_CATEGORIES_SQL).execute(&mut **tx).await?;

        Ok(())
    }

    /// All categories in tree order.
    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(LIST_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Roots and their direct children in tree order.
    pub(crate) async fn list_menu_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(LIST_MENU_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: CategoryUuid,
    ) -> Result<CategoryRecord, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(GET_CATEGORY_SQL)
            .bind(category.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_ancestors(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        bounds: NestedSetBounds,
    ) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        Self::list_within(tx, LIST_ANCESTORS_SQL, bounds).await
    }

    pub(crate) async fn list_descendants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        bounds: NestedSetBounds,
    ) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        Self::list_within(tx, LIST_DESCENDANTS_SQL, bounds).await
    }

    async fn list_within(
        tx: &mut Transaction<'_, Postgres>,
        sql: &'static str,
        bounds: NestedSetBounds,
    ) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(sql)
            .bind(to_i32(bounds.tree_id)?)
            .bind(to_i32(bounds.lft)?)
            .bind(to_i32(bounds.rgt)?)
            .fetch_all(&mut **tx)
            .await
    }

    /// Slugs under `parent` starting with `prefix`, ignoring `exclude`.
    pub(crate) async fn sibling_slugs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        parent: Option<CategoryUuid>,
        prefix: &str,
        exclude: Option<CategoryUuid>,
    ) -> Result<Vec<String>, sqlx::Error> {
        query_scalar::<Postgres, String>(SIBLING_SLUGS_SQL)
            .bind(parent.map(CategoryUuid::into_uuid))
            .bind(prefix)
            .bind(exclude.map(CategoryUuid::into_uuid))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: &NewCategory,
        slug: &str,
        bounds: NestedSetBounds,
    ) -> Result<CategoryRecord, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(CREATE_CATEGORY_SQL)
            .bind(category.uuid.into_uuid())
            .bind(&category.title)
            .bind(slug)
            .bind(&category.description)
            .bind(category.parent.map(CategoryUuid::into_uuid))
            .bind(category.top_product.map(ProductUuid::into_uuid))
            .bind(to_i32(bounds.tree_id)?)
            .bind(to_i32(bounds.lft)?)
            .bind(to_i32(bounds.rgt)?)
            .bind(to_i32(bounds.level)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: CategoryUuid,
        update: &CategoryUpdate,
        slug: Option<&str>,
    ) -> Result<CategoryRecord, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(UPDATE_CATEGORY_SQL)
            .bind(category.into_uuid())
            .bind(&update.title)
            .bind(slug)
            .bind(&update.description)
            .bind(update.parent.map(CategoryUuid::into_uuid))
            .bind(update.top_product.map(ProductUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    /// Persist recomputed nested-set indices in one statement.
    pub(crate) async fn update_bounds(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        changes: &[(CategoryUuid, NestedSetBounds)],
    ) -> Result<u64, sqlx::Error> {
        if changes.is_empty() {
            return Ok(0);
        }

        let mut uuids: Vec<Uuid> = Vec::with_capacity(changes.len());
        let mut tree_ids: Vec<i32> = Vec::with_capacity(changes.len());
        let mut lfts: Vec<i32> = Vec::with_capacity(changes.len());
        let mut rgts: Vec<i32> = Vec::with_capacity(changes.len());
        let mut levels: Vec<i32> = Vec::with_capacity(changes.len());

        for (uuid, bounds) in changes {
            uuids.push(uuid.into_uuid());
            tree_ids.push(to_i32(bounds.tree_id)?);
            lfts.push(to_i32(bounds.lft)?);
            rgts.push(to_i32(bounds.rgt)?);
            levels.push(to_i32(bounds.level)?);
        }

        let result = query(UPDATE_CATEGORY_BOUNDS_SQL)
            .bind(uuids)
            .bind(tree_ids)
            .bind(lfts)
            .bind(rgts)
            .bind(levels)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn delete_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: CategoryUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_CATEGORY_SQL)
            .bind(category.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}

impl<'r> FromRow<'r, PgRow> for CategoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let parent_uuid: Option<Uuid> = row.try_get("parent_uuid")?;
        let top_product_uuid: Option<Uuid> = row.try_get("top_product_uuid")?;

        Ok(Self {
            uuid: CategoryUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            parent_uuid: parent_uuid.map(CategoryUuid::from_uuid),
            top_product_uuid: top_product_uuid.map(ProductUuid::from_uuid),
            bounds: NestedSetBounds {
                tree_id: try_get_u32(row, "tree_id")?,
                lft: try_get_u32(row, "lft")?,
                rgt: try_get_u32(row, "rgt")?,
                level: try_get_u32(row, "level")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
