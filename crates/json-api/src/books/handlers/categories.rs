//! Catalog Categories Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_app::domain::categories::models::Category;

use crate::{extensions::*, state::State};

/// Category projection for the storefront filter list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryMetaResponse {
    pub uuid: Uuid,
    pub name: String,
}

impl From<Category> for CategoryMetaResponse {
    fn from(category: Category) -> Self {
        Self {
            uuid: category.uuid.into(),
            name: category.name,
        }
    }
}

/// Catalog Categories Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoriesMetaResponse {
    /// The list of categories
    pub categories: Vec<CategoryMetaResponse>,
}

/// Catalog Categories Handler
///
/// Returns every category, for storefront filters.
#[endpoint(tags("books"), summary = "List Catalog Categories")]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<CategoriesMetaResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let categories = state
        .app
        .categories
        .list_categories()
        .await
        .or_500("failed to fetch categories")?;

    Ok(Json(CategoriesMetaResponse {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use folio_app::domain::categories::MockCategoriesService;

    use crate::test_helpers::{mock_app, sample_category, service_with_state};

    use super::*;

    #[tokio::test]
    async fn test_meta_categories_returns_list() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_list_categories()
            .once()
            .return_once(|| Ok(vec![sample_category("Poetry")]));

        let mut app = mock_app();
        app.categories = Arc::new(categories);

        let service =
            service_with_state(app, Router::with_path("books/meta/categories").get(handler));

        let mut res = TestClient::get("http://example.com/books/meta/categories")
            .send(&service)
            .await;

        let body: CategoriesMetaResponse = res.take_json().await?;

        assert_eq!(body.categories.len(), 1);
        assert_eq!(body.categories[0].name, "Poetry");

        Ok(())
    }
}
