//! Admin Stats Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Admin Stats Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdminStatsResponse {
    pub books: u64,

    pub users: u64,

    pub orders: u64,

    /// Sum of non-cancelled order totals, in minor units
    pub revenue: u64,

    pub pending_orders: u64,
}

/// Admin Stats Handler
#[endpoint(tags("admin"), summary = "Admin Stats", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AdminStatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .stats
        .admin_stats()
        .await
        .or_500("failed to compute admin stats")?;

    Ok(Json(AdminStatsResponse {
        books: stats.books,
        users: stats.users,
        orders: stats.orders,
        revenue: stats.revenue,
        pending_orders: stats.pending_orders,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use folio_app::domain::stats::{MockStatsService, models::AdminStats};

    use crate::test_helpers::{admin_service, mock_app, user_service};

    use super::*;

    #[tokio::test]
    async fn test_stats_returns_counters() -> TestResult {
        let mut stats = MockStatsService::new();

        stats.expect_admin_stats().once().return_once(|| {
            Ok(AdminStats {
                books: 3,
                users: 2,
                orders: 5,
                revenue: 1_234_00,
                pending_orders: 1,
            })
        });

        let mut app = mock_app();
        app.stats = Arc::new(stats);

        let service = admin_service(app, Router::with_path("admin/stats").get(handler));

        let mut res = TestClient::get("http://example.com/admin/stats")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: AdminStatsResponse = res.take_json().await?;

        assert_eq!(body.revenue, 1_234_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_stats_forbidden_for_plain_users() -> TestResult {
        let app = mock_app();

        let service = user_service(
            app,
            Router::new()
                .hoop(crate::auth::middleware::admin_only)
                .push(Router::with_path("admin/stats").get(handler)),
        );

        let res = TestClient::get("http://example.com/admin/stats")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
