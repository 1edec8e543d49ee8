//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{to_i32, to_i64, try_get_u32, try_get_u64},
    domain::{
        categories::records::CategoryUuid,
        discounts::records::DiscountUuid,
        products::{
            data::{NewProduct, ProductSearch, ProductUpdate},
            records::{ProductRecord, ProductUuid},
        },
    },
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const PRODUCT_EXISTS_SQL: &str = include_str!("sql/product_exists.sql");
const SEARCH_PRODUCTS_SQL: &str = include_str!("sql/search_products.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("sql/count_products.sql");
const LIST_CATEGORY_PRODUCTS_SQL: &str = include_str!("sql/list_category_products.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const PRODUCT_SLUGS_SQL: &str = include_str!("sql/product_slugs.sql");
const CREATE_PRODUCT_CATEGORIES_SQL: &str = include_str!("sql/create_product_categories.sql");
const DELETE_PRODUCT_CATEGORIES_SQL: &str = include_str!("sql/delete_product_categories.sql");
const CREATE_PRODUCT_DISCOUNTS_SQL: &str = include_str!("sql/create_product_discounts.sql");
const DELETE_PRODUCT_DISCOUNTS_SQL: &str = include_str!("sql/delete_product_discounts.sql");

/// Unique constraint backing product slugs.
pub(crate) const PRODUCT_SLUG_CONSTRAINT: &str = "products_slug_unique";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn product_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(PRODUCT_EXISTS_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn search_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        search: &ProductSearch,
    ) -> Result<(Vec<ProductRecord>, u64), sqlx::Error> {
        let pattern = search.query.as_deref().map(escape_like);
        let category = search.category.map(CategoryUuid::into_uuid);
        let min_price = search.price.min().map(to_i64).transpose()?;
        let max_price = search.price.max().map(to_i64).transpose()?;
        let limit = i64::from(search.page.size());
        let offset = to_i64(search.page.offset())?;

        let total: i64 = query_scalar(COUNT_PRODUCTS_SQL)
            .bind(pattern.as_deref())
            .bind(category)
            .bind(min_price)
            .bind(max_price)
            .fetch_one(&mut **tx)
            .await?;

        let products = query_as::<Postgres, ProductRecord>(SEARCH_PRODUCTS_SQL)
            .bind(pattern.as_deref())
            .bind(category)
            .bind(min_price)
            .bind(max_price)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await?;

        Ok((products, u64::try_from(total).unwrap_or_default()))
    }

    pub(crate) async fn list_category_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        categories: &[CategoryUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let categories: Vec<Uuid> = categories.iter().map(|c| c.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(LIST_CATEGORY_PRODUCTS_SQL)
            .bind(categories)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn slugs_with_prefix(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        prefix: &str,
        exclude: Option<ProductUuid>,
    ) -> Result<Vec<String>, sqlx::Error> {
        query_scalar::<Postgres, String>(PRODUCT_SLUGS_SQL)
            .bind(prefix)
            .bind(exclude.map(ProductUuid::into_uuid))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
        slug: &str,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(slug)
            .bind(to_i64(product.unit_price)?)
            .bind(&product.description)
            .bind(&product.short_description)
            .bind(to_i32(product.inventory)?)
            .bind(product.is_active)
            .bind(product.cover.as_deref())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&update.name)
            .bind(update.slug.as_deref())
            .bind(to_i64(update.unit_price)?)
            .bind(&update.description)
            .bind(&update.short_description)
            .bind(to_i32(update.inventory)?)
            .bind(update.is_active)
            .bind(update.cover.as_deref())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn set_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        categories: &[CategoryUuid],
    ) -> Result<(), sqlx::Error> {
        let categories: Vec<Uuid> = categories.iter().map(|c| c.into_uuid()).collect();

        query(DELETE_PRODUCT_CATEGORIES_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?;

        query(CREATE_PRODUCT_CATEGORIES_SQL)
            .bind(product.into_uuid())
            .bind(categories)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn set_discounts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        discounts: &[DiscountUuid],
    ) -> Result<(), sqlx::Error> {
        let discounts: Vec<Uuid> = discounts.iter().map(|d| d.into_uuid()).collect();

        query(DELETE_PRODUCT_DISCOUNTS_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?;

        query(CREATE_PRODUCT_DISCOUNTS_SQL)
            .bind(product.into_uuid())
            .bind(discounts)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

/// Escape `LIKE` wildcards so the query matches literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());

    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }

        escaped.push(ch);
    }

    escaped
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let categories: Vec<Uuid> = row.try_get("category_uuids")?;
        let discounts: Vec<Uuid> = row.try_get("discount_uuids")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            unit_price: try_get_u64(row, "unit_price")?,
            description: row.try_get("description")?,
            short_description: row.try_get("short_description")?,
            inventory: try_get_u32(row, "inventory")?,
            is_active: row.try_get("is_active")?,
            cover: row.try_get("cover")?,
            categories: categories.into_iter().map(CategoryUuid::from_uuid).collect(),
            discounts: discounts.into_iter().map(DiscountUuid::from_uuid).collect(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
