//! Category Tree Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::categories::records::CategoryTreeEntry;

use crate::{categories::errors::into_status_error, extensions::*, state::State};

/// One category in tree order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryTreeEntryResponse {
    pub uuid: Uuid,
    pub title: String,
    pub slug: String,
    pub parent_uuid: Option<Uuid>,

    /// Depth below the root (roots are level 0)
    pub level: u32,

    /// Titles from the root down, joined with `>`
    pub full_path: String,
}

impl From<CategoryTreeEntry> for CategoryTreeEntryResponse {
    fn from(entry: CategoryTreeEntry) -> Self {
        Self {
            uuid: entry.category.uuid.into(),
            title: entry.category.title,
            slug: entry.category.slug,
            parent_uuid: entry.category.parent_uuid.map(Into::into),
            level: entry.category.bounds.level,
            full_path: entry.full_path,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryTreeResponse {
    /// Every category, depth first
    pub categories: Vec<CategoryTreeEntryResponse>,
}

/// Category Tree Handler
///
/// Returns the whole category forest in pre-order.
#[endpoint(tags("categories"), summary = "Category Tree")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CategoryTreeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let entries = state
        .app
        .categories
        .category_tree()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CategoryTreeResponse {
        categories: entries.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::categories::{MockCategoriesService, records::CategoryUuid};

    use crate::test_helpers::{bounds, categories_service, make_category};

    use super::*;

    #[tokio::test]
    async fn test_tree_lists_full_paths_in_order() -> TestResult {
        let men = CategoryUuid::new();
        let shoes = CategoryUuid::new();

        let mut categories = MockCategoriesService::new();

        categories.expect_category_tree().once().return_once(move || {
            Ok(vec![
                CategoryTreeEntry {
                    category: make_category(men, "Men", None, bounds(1, 1, 4, 0)),
                    full_path: "Men".to_owned(),
                },
                CategoryTreeEntry {
                    category: make_category(shoes, "Shoes", Some(men), bounds(1, 2, 3, 1)),
                    full_path: "Men>Shoes".to_owned(),
                },
            ])
        });

        let service = categories_service(
            categories,
            Router::with_path("categories/tree").get(handler),
        );

        let response: CategoryTreeResponse = TestClient::get("http://example.com/categories/tree")
            .send(&service)
            .await
            .take_json()
            .await?;

        let paths: Vec<(&str, u32)> = response
            .categories
            .iter()
            .map(|entry| (entry.full_path.as_str(), entry.level))
            .collect();

        assert_eq!(paths, vec![("Men", 0), ("Men>Shoes", 1)]);
        assert_eq!(
            response.categories.get(1).and_then(|entry| entry.parent_uuid),
            Some(men.into_uuid())
        );

        Ok(())
    }
}
