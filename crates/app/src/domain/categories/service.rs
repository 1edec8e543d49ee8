//! Categories service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use storefront::{
    categories::{CategorySeed, CategoryTree, DEFAULT_PATH_SEPARATOR},
    slugs::{SlugError, is_valid_slug, slugify, unique_slug},
};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        categories::{
            data::{CategoryUpdate, NewCategory},
            errors::CategoriesServiceError,
            records::{
                CategoryBranch, CategoryDetails, CategoryRecord, CategoryTreeEntry, CategoryUuid,
            },
            repository::PgCategoriesRepository,
        },
        products::repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCategoriesService {
    db: Db,
    repository: PgCategoriesRepository,
    products: PgProductsRepository,
}

impl PgCategoriesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCategoriesRepository::new(),
            products: PgProductsRepository::new(),
        }
    }

    async fn load_tree(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<CategoryTree<CategoryUuid>, CategoriesServiceError> {
        let categories = self.repository.list_categories(tx).await?;

        Ok(CategoryTree::from_nodes(categories.into_iter().map(seed))?)
    }

    async fn resolve_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        title: &str,
        explicit: Option<&str>,
        parent: Option<CategoryUuid>,
    ) -> Result<String, CategoriesServiceError> {
        if let Some(slug) = explicit {
            return if is_valid_slug(slug) {
                Ok(slug.to_owned())
            } else {
                Err(CategoriesServiceError::InvalidData)
            };
        }

        let base = slugify(title);

        if base.is_empty() {
            return Err(SlugError::Empty.into());
        }

        let taken = self
            .repository
            .sibling_slugs(tx, parent, &base, None)
            .await?;

        Ok(unique_slug(&base, taken.iter().map(String::as_str))?)
    }
}

fn seed(category: CategoryRecord) -> CategorySeed<CategoryUuid> {
    CategorySeed {
        id: category.uuid,
        title: category.title,
        parent: category.parent_uuid,
        bounds: Some(category.bounds),
    }
}

fn full_path(ancestors: &[CategoryRecord], category: &CategoryRecord) -> String {
    ancestors
        .iter()
        .chain(std::iter::once(category))
        .map(|c| c.title.as_str())
        .collect::<Vec<_>>()
        .join(DEFAULT_PATH_SEPARATOR)
}

#[async_trait]
impl CategoriesService for PgCategoriesService {
    async fn list_root_categories(&self) -> Result<Vec<CategoryBranch>, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_menu_categories(&mut tx).await?;

        tx.commit().await?;

        let mut children: FxHashMap<CategoryUuid, Vec<CategoryRecord>> = FxHashMap::default();
        let mut roots = Vec::new();

        for category in categories {
            match category.parent_uuid {
                Some(parent) => children.entry(parent).or_default().push(category),
                None => roots.push(category),
            }
        }

        Ok(roots
            .into_iter()
            .map(|category| CategoryBranch {
                children: children.remove(&category.uuid).unwrap_or_default(),
                category,
            })
            .collect())
    }

    async fn category_tree(&self) -> Result<Vec<CategoryTreeEntry>, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        let tree = CategoryTree::from_nodes(categories.iter().cloned().map(seed))?;

        let mut by_uuid: FxHashMap<CategoryUuid, CategoryRecord> = categories
            .into_iter()
            .map(|category| (category.uuid, category))
            .collect();

        Ok(tree
            .walk()
            .filter_map(|entry| {
                let mut category = by_uuid.remove(&entry.id)?;

                category.bounds = entry.bounds;

                Some(CategoryTreeEntry {
                    full_path: tree
                        .full_path(entry.id, DEFAULT_PATH_SEPARATOR)
                        .unwrap_or_default(),
                    category,
                })
            })
            .collect())
    }

    async fn get_category(
        &self,
        category: CategoryUuid,
    ) -> Result<CategoryDetails, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let category = self.repository.get_category(&mut tx, category).await?;

        let ancestors = self
            .repository
            .list_ancestors(&mut tx, category.bounds)
            .await?;

        let descendants = self
            .repository
            .list_descendants(&mut tx, category.bounds)
            .await?;

        let subtree: Vec<CategoryUuid> = std::iter::once(category.uuid)
            .chain(descendants.iter().map(|c| c.uuid))
            .collect();

        let products = self
            .products
            .list_category_products(&mut tx, &subtree)
            .await?;

        tx.commit().await?;

        Ok(CategoryDetails {
            full_path: full_path(&ancestors, &category),
            category,
            ancestors,
            descendants,
            products,
        })
    }

    #[tracing::instrument(
        name = "categories.service.create_category",
        skip(self, category),
        fields(category_uuid = %category.uuid, parent = ?category.parent),
        err
    )]
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError> {
        if category.title.trim().is_empty() {
            return Err(CategoriesServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        self.repository.lock_categories(&mut tx).await?;

        let mut tree = self.load_tree(&mut tx).await?;

        let bounds = tree.insert(category.uuid, category.title.clone(), category.parent)?;

        let slug = self
            .resolve_slug(
                &mut tx,
                &category.title,
                category.slug.as_deref(),
                category.parent,
            )
            .await?;

        let shifted: Vec<_> = tree
            .drain_changes()
            .into_iter()
            .filter(|(uuid, _)| *uuid != category.uuid)
            .collect();

        self.repository.update_bounds(&mut tx, &shifted).await?;

        let created = self
            .repository
            .create_category(&mut tx, &category, &slug, bounds)
            .await?;

        tx.commit().await?;

        info!(
            category_uuid = %created.uuid,
            slug = %created.slug,
            shifted = shifted.len(),
            "created category"
        );

        Ok(created)
    }

    #[tracing::instrument(
        name = "categories.service.update_category",
        skip(self, update),
        fields(category_uuid = %category, parent = ?update.parent),
        err
    )]
    async fn update_category(
        &self,
        category: CategoryUuid,
        update: CategoryUpdate,
    ) -> Result<CategoryRecord, CategoriesServiceError> {
        if update.title.trim().is_empty() {
            return Err(CategoriesServiceError::MissingRequiredData);
        }

        if let Some(slug) = update.slug.as_deref()
            && !is_valid_slug(slug)
        {
            return Err(CategoriesServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        self.repository.lock_categories(&mut tx).await?;

        let mut tree = self.load_tree(&mut tx).await?;

        if !tree.contains(category) {
            return Err(CategoriesServiceError::NotFound);
        }

        tree.move_to(category, update.parent)?;
        tree.rename(category, update.title.clone())?;

        let changes = tree.drain_changes();

        self.repository.update_bounds(&mut tx, &changes).await?;

        let updated = self
            .repository
            .update_category(&mut tx, category, &update, update.slug.as_deref())
            .await?;

        tx.commit().await?;

        debug!(slug = %updated.slug, shifted = changes.len(), "updated category");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "categories.service.delete_category",
        skip(self),
        fields(category_uuid = %category),
        err
    )]
    async fn delete_category(&self, category: CategoryUuid) -> Result<(), CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.lock_categories(&mut tx).await?;

        let mut tree = self.load_tree(&mut tx).await?;

        let removed = tree.remove(category)?;

        let rows_affected = self.repository.delete_category(&mut tx, category).await?;

        if rows_affected == 0 {
            return Err(CategoriesServiceError::NotFound);
        }

        let changes = tree.drain_changes();

        self.repository.update_bounds(&mut tx, &changes).await?;

        tx.commit().await?;

        info!(removed = removed.len(), "deleted category subtree");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// Root categories with their direct children, in tree order.
    async fn list_root_categories(&self) -> Result<Vec<CategoryBranch>, CategoriesServiceError>;

    /// Every category in pre-order with its full path.
    async fn category_tree(&self) -> Result<Vec<CategoryTreeEntry>, CategoriesServiceError>;

    /// Retrieve a category with its lineage and the products filed under its subtree.
    async fn get_category(
        &self,
        category: CategoryUuid,
    ) -> Result<CategoryDetails, CategoriesServiceError>;

    /// Creates a category, deriving a sibling-unique slug from the title when none is given.
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError>;

    /// Replaces a category's fields, moving its subtree when the parent changes.
    async fn update_category(
        &self,
        category: CategoryUuid,
        update: CategoryUpdate,
    ) -> Result<CategoryRecord, CategoriesServiceError>;

    /// Deletes a category together with its descendants.
    async fn delete_category(&self, category: CategoryUuid) -> Result<(), CategoriesServiceError>;
}
