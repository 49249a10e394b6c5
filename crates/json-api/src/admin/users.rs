//! Admin User Handlers

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{errors::into_status_error, handlers::UserResponse},
    extensions::*,
    state::State,
};

/// Users Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersResponse {
    /// The page of accounts, newest first
    pub users: Vec<UserResponse>,

    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Admin User Index Handler
#[endpoint(tags("admin"), summary = "List Users", security(("bearer_auth" = [])))]
pub(crate) async fn index(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<UsersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let page = page_from_params(page, per_page);

    let listing = state
        .app
        .auth
        .list_users(page)
        .await
        .map_err(into_status_error)?;

    Ok(Json(UsersResponse {
        meta: PageMeta::from(&listing),
        users: listing.items.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use folio_app::{auth::MockAuthService, domain::pagination::Paginated};

    use crate::test_helpers::{admin_service, mock_app, sample_user};

    use super::*;

    #[tokio::test]
    async fn test_index_returns_accounts() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_list_users()
            .once()
            .return_once(|page| Ok(Paginated::new(vec![sample_user()], page, 1)));

        let mut app = mock_app();
        app.auth = Arc::new(auth);

        let service = admin_service(app, Router::with_path("admin/users").get(index));

        let mut res = TestClient::get("http://example.com/admin/users")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: UsersResponse = res.take_json().await?;

        assert_eq!(body.users.len(), 1);

        Ok(())
    }
}
