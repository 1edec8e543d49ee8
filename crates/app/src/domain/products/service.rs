//! Products service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use storefront::slugs::{SlugError, is_valid_slug, slugify, unique_slug};
use tracing::{Span, debug, info, warn};

use crate::{
    database::{Db, is_unique_violation},
    domain::{
        comments::repository::PgCommentsRepository,
        products::{
            data::{NewProduct, ProductSearch, ProductUpdate},
            errors::ProductsServiceError,
            records::{ProductDetails, ProductPage, ProductRecord, ProductUuid},
            repository::{PRODUCT_SLUG_CONSTRAINT, PgProductsRepository},
        },
    },
};

/// Attempts made when a derived slug is taken by a concurrent insert.
pub const SLUG_INSERT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
    comments: PgCommentsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
            comments: PgCommentsRepository::new(),
        }
    }

    async fn resolve_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        explicit: Option<&str>,
        exclude: Option<ProductUuid>,
    ) -> Result<String, ProductsServiceError> {
        if let Some(slug) = explicit {
            return if is_valid_slug(slug) {
                Ok(slug.to_owned())
            } else {
                Err(ProductsServiceError::InvalidData)
            };
        }

        let base = slugify(name);

        if base.is_empty() {
            return Err(SlugError::Empty.into());
        }

        let taken = self
            .repository
            .slugs_with_prefix(tx, &base, exclude)
            .await?;

        Ok(unique_slug(&base, taken.iter().map(String::as_str))?)
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[tracing::instrument(
        name = "products.service.search_products",
        skip(self, search),
        fields(
            query = ?search.query,
            category = ?search.category,
            page = search.page.number(),
            result_count = tracing::field::Empty
        ),
        err
    )]
    async fn search_products(
        &self,
        search: ProductSearch,
    ) -> Result<ProductPage, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let (products, total) = self.repository.search_products(&mut tx, &search).await?;

        tx.commit().await?;

        Span::current().record("result_count", products.len());

        Ok(ProductPage {
            products,
            total,
            page: search.page,
        })
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductDetails, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        let comments = self
            .comments
            .list_approved_comments(&mut tx, product.uuid)
            .await?;

        tx.commit().await?;

        Ok(ProductDetails { product, comments })
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, slug = tracing::field::Empty),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut attempt = 1;

        loop {
            let mut tx = self.db.begin().await?;

            let slug = self
                .resolve_slug(&mut tx, &product.name, product.slug.as_deref(), None)
                .await?;

            match self.repository.create_product(&mut tx, &product, &slug).await {
                Ok(()) => {}
                Err(error)
                    if product.slug.is_none()
                        && attempt < SLUG_INSERT_ATTEMPTS
                        && is_unique_violation(&error, PRODUCT_SLUG_CONSTRAINT) =>
                {
                    warn!(attempt, %slug, "derived slug taken concurrently, retrying");

                    attempt += 1;

                    continue;
                }
                Err(error) => return Err(error.into()),
            }

            self.repository
                .set_categories(&mut tx, product.uuid, &product.categories)
                .await?;

            self.repository
                .set_discounts(&mut tx, product.uuid, &product.discounts)
                .await?;

            let created = self.repository.get_product(&mut tx, product.uuid).await?;

            tx.commit().await?;

            Span::current().record("slug", created.slug.as_str());

            info!(product_uuid = %created.uuid, "created product");

            return Ok(created);
        }
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, update),
        fields(product_uuid = %product),
        err
    )]
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        if let Some(slug) = update.slug.as_deref() {
            self.resolve_slug(&mut tx, &update.name, Some(slug), Some(product))
                .await?;
        }

        let rows_affected = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        self.repository
            .set_categories(&mut tx, product, &update.categories)
            .await?;

        self.repository
            .set_discounts(&mut tx, product, &update.discounts)
            .await?;

        let updated = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        debug!(slug = %updated.slug, "updated product");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "products.service.delete_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .delete_product(&mut tx, product)
            .await
            .map_err(|error| match ProductsServiceError::from(error) {
                ProductsServiceError::InvalidReference => ProductsServiceError::InUse,
                other => other,
            })?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Search active products.
    async fn search_products(
        &self,
        search: ProductSearch,
    ) -> Result<ProductPage, ProductsServiceError>;

    /// Retrieve a single product with its approved comments.
    async fn get_product(&self, product: ProductUuid)
    -> Result<ProductDetails, ProductsServiceError>;

    /// Creates a new product, deriving its slug from the name when none is given.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces a product's fields and relations.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Deletes a product with the given UUID.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use storefront::search::{Page, PriceRange};
    use testresult::TestResult;

    use crate::{
        domain::categories::{CategoriesService, data::NewCategory, records::CategoryUuid},
        test::{TestContext, helpers::new_product},
    };

    use super::*;

    #[tokio::test]
    async fn create_product_derives_slug_from_name() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .products
            .create_product(new_product("Red Shoes", 999))
            .await?;

        assert_eq!(product.slug, "red-shoes");
        assert_eq!(product.unit_price, 999);
        assert!(product.is_active, "products are active by default");

        Ok(())
    }

    #[tokio::test]
    async fn colliding_names_get_counter_suffixes() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx.products.create_product(new_product("Hat", 10)).await?;
        let second = ctx.products.create_product(new_product("Hat", 10)).await?;
        let third = ctx.products.create_product(new_product("hat!", 10)).await?;

        assert_eq!(first.slug, "hat");
        assert_eq!(second.slug, "hat-1");
        assert_eq!(third.slug, "hat-2");

        Ok(())
    }

    #[tokio::test]
    async fn explicit_colliding_slug_is_a_conflict() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.products.create_product(new_product("Hat", 10)).await?;

        let result = ctx
            .products
            .create_product(NewProduct {
                slug: Some("hat".to_string()),
                ..new_product("Cap", 10)
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn punctuation_only_name_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx.products.create_product(new_product("!!!", 10)).await;

        assert!(
            matches!(
                result,
                Err(ProductsServiceError::InvalidSlug(SlugError::Empty))
            ),
            "expected InvalidSlug, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_keeps_slug_when_not_supplied() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.products.create_product(new_product("Boots", 100)).await?;

        let updated = ctx
            .products
            .update_product(
                created.uuid,
                ProductUpdate {
                    name: "Winter Boots".to_string(),
                    slug: None,
                    unit_price: 150,
                    description: created.description.clone(),
                    short_description: created.short_description.clone(),
                    inventory: 3,
                    is_active: true,
                    cover: None,
                    categories: Vec::new(),
                    discounts: Vec::new(),
                },
            )
            .await?;

        assert_eq!(updated.slug, "boots");
        assert_eq!(updated.name, "Winter Boots");
        assert_eq!(updated.unit_price, 150);

        Ok(())
    }

    #[tokio::test]
    async fn search_filters_by_price_and_activity() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.products.create_product(new_product("Cheap", 50)).await?;
        ctx.products.create_product(new_product("Middle", 150)).await?;
        ctx.products.create_product(new_product("Upper", 200)).await?;
        ctx.products.create_product(new_product("Pricey", 500)).await?;
        ctx.products
            .create_product(NewProduct {
                is_active: false,
                ..new_product("Hidden", 120)
            })
            .await?;

        let page = ctx
            .products
            .search_products(ProductSearch {
                price: PriceRange::new(Some(100), Some(200))?,
                page: Page::new(None, Some(10))?,
                ..ProductSearch::default()
            })
            .await?;

        let mut names: Vec<&str> = page.products.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();

        assert_eq!(names, vec!["Middle", "Upper"]);
        assert_eq!(page.total, 2);

        Ok(())
    }

    #[tokio::test]
    async fn search_matches_text_and_category() -> TestResult {
        let ctx = TestContext::new().await;
        let category = CategoryUuid::new();

        ctx.categories
            .create_category(NewCategory {
                uuid: category,
                title: "Shoes".to_string(),
                slug: None,
                description: String::new(),
                parent: None,
                top_product: None,
            })
            .await?;

        ctx.products
            .create_product(NewProduct {
                categories: vec![category],
                short_description: "Waterproof leather".to_string(),
                ..new_product("Boots", 100)
            })
            .await?;

        ctx.products.create_product(new_product("Leather Belt", 40)).await?;

        let by_text = ctx
            .products
            .search_products(ProductSearch {
                query: Some("LEATHER".to_string()),
                ..ProductSearch::default()
            })
            .await?;

        let by_category = ctx
            .products
            .search_products(ProductSearch {
                query: Some("leather".to_string()),
                category: Some(category),
                ..ProductSearch::default()
            })
            .await?;

        assert_eq!(by_text.total, 2);
        assert_eq!(by_category.products.len(), 1);
        assert_eq!(
            by_category.products.first().map(|p| p.name.as_str()),
            Some("Boots")
        );

        Ok(())
    }

    #[tokio::test]
    async fn search_pages_three_at_a_time() -> TestResult {
        let ctx = TestContext::new().await;

        for name in ["A", "B", "C", "D", "E"] {
            ctx.products.create_product(new_product(name, 10)).await?;
        }

        let first = ctx
            .products
            .search_products(ProductSearch::default())
            .await?;

        let second = ctx
            .products
            .search_products(ProductSearch {
                page: Page::new(Some(2), None)?,
                ..ProductSearch::default()
            })
            .await?;

        assert_eq!(first.products.len(), 3);
        assert_eq!(second.products.len(), 2);
        assert_eq!(first.total, 5);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_category_reference_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(NewProduct {
                categories: vec![CategoryUuid::new()],
                ..new_product("Orphan", 10)
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn delete_product_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.products.create_product(new_product("Scarf", 30)).await?;

        ctx.products.delete_product(product.uuid).await?;

        let result = ctx.products.get_product(product.uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        Ok(())
    }
}
