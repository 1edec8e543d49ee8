//! Category Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::categories::records::CategoryBranch;

use crate::{
    categories::{errors::into_status_error, get::CategoryResponse},
    extensions::*,
    state::State,
};

/// A root category with its direct children.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryBranchResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,

    /// Direct children in tree order
    pub children: Vec<CategoryResponse>,
}

impl From<CategoryBranch> for CategoryBranchResponse {
    fn from(branch: CategoryBranch) -> Self {
        Self {
            category: branch.category.into(),
            children: branch.children.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoriesResponse {
    /// Root categories in tree order
    pub categories: Vec<CategoryBranchResponse>,
}

/// Category Index Handler
///
/// Returns the root categories with their direct children, as used by menus.
#[endpoint(tags("categories"), summary = "List Root Categories")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CategoriesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let branches = state
        .app
        .categories
        .list_root_categories()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CategoriesResponse {
        categories: branches.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use uuid::Uuid;

    use storefront_app::domain::categories::{MockCategoriesService, records::CategoryUuid};

    use crate::test_helpers::{bounds, categories_service, make_category};

    use super::*;

    fn make_service(categories: MockCategoriesService) -> Service {
        categories_service(categories, Router::with_path("categories").get(handler))
    }

    #[tokio::test]
    async fn test_index_groups_children_under_roots() -> TestResult {
        let men = CategoryUuid::new();
        let women = CategoryUuid::new();
        let shoes = CategoryUuid::new();

        let mut categories = MockCategoriesService::new();

        categories
            .expect_list_root_categories()
            .once()
            .return_once(move || {
                Ok(vec![
                    CategoryBranch {
                        category: make_category(men, "Men", None, bounds(1, 1, 4, 0)),
                        children: vec![make_category(
                            shoes,
                            "Shoes",
                            Some(men),
                            bounds(1, 2, 3, 1),
                        )],
                    },
                    CategoryBranch {
                        category: make_category(women, "Women", None, bounds(2, 1, 2, 0)),
                        children: vec![],
                    },
                ])
            });

        let response: CategoriesResponse = TestClient::get("http://example.com/categories")
            .send(&make_service(categories))
            .await
            .take_json()
            .await?;

        let titles: Vec<&str> = response
            .categories
            .iter()
            .map(|branch| branch.category.title.as_str())
            .collect();

        assert_eq!(titles, vec!["Men", "Women"]);
        let children: Vec<Vec<Uuid>> = response
            .categories
            .iter()
            .map(|branch| branch.children.iter().map(|child| child.uuid).collect())
            .collect();

        assert_eq!(children, vec![vec![shoes.into_uuid()], vec![]]);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_returns_empty_list() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_list_root_categories()
            .once()
            .return_once(|| Ok(vec![]));

        let response: CategoriesResponse = TestClient::get("http://example.com/categories")
            .send(&make_service(categories))
            .await
            .take_json()
            .await?;

        assert!(response.categories.is_empty());

        Ok(())
    }
}
