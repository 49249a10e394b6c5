//! Admin Order Handlers

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_app::domain::orders::models::OrderStatus;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::get::OrderResponse},
    state::State,
};

/// All Orders Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AllOrdersResponse {
    /// The page of orders, newest first
    pub orders: Vec<OrderResponse>,

    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Admin Order Index Handler
///
/// Returns every order in the system, newest first.
#[endpoint(tags("admin"), summary = "List All Orders", security(("bearer_auth" = [])))]
pub(crate) async fn index(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<AllOrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let page = page_from_params(page, per_page);

    let listing = state
        .app
        .orders
        .list_all_orders(page)
        .await
        .map_err(into_status_error)?;

    Ok(Json(AllOrdersResponse {
        meta: PageMeta::from(&listing),
        orders: listing.items.into_iter().map(Into::into).collect(),
    }))
}

/// Set Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetStatusRequest {
    /// `pending`, `processing`, `shipped`, `delivered`, or `cancelled`
    pub status: String,
}

/// Set Order Status Handler
///
/// Moves an order along the fulfilment chain; illegal jumps are rejected.
#[endpoint(
    tags("admin"),
    summary = "Set Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Illegal transition"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn status(
    order: PathParam<Uuid>,
    json: JsonBody<SetStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status: OrderStatus = json
        .into_inner()
        .status
        .parse()
        .map_err(|_| StatusError::bad_request().brief("Unknown order status"))?;

    let order = state
        .app
        .orders
        .set_status(order.into_inner().into(), status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use folio_app::domain::{
        orders::{MockOrdersService, OrdersServiceError, models::OrderUuid},
        pagination::Paginated,
    };

    use crate::test_helpers::{admin_service, mock_app, sample_order};

    use super::*;

    #[tokio::test]
    async fn test_index_lists_everyones_orders() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_all_orders().once().return_once(|page| {
            Ok(Paginated::new(vec![sample_order(OrderUuid::new())], page, 1))
        });

        let mut app = mock_app();
        app.orders = Arc::new(orders);

        let service = admin_service(app, Router::with_path("admin/orders").get(index));

        let res = TestClient::get("http://example.com/admin/orders")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_status_update_passes_through() -> TestResult {
        let uuid = OrderUuid::new();
        let order = sample_order(uuid);

        let mut orders = MockOrdersService::new();

        orders
            .expect_set_status()
            .once()
            .withf(move |o, status| *o == uuid && *status == OrderStatus::Processing)
            .return_once(move |_, _| Ok(order));

        let mut app = mock_app();
        app.orders = Arc::new(orders);

        let service = admin_service(
            app,
            Router::with_path("admin/orders/{uuid}/status").put(status),
        );

        let res = TestClient::put(format!("http://example.com/admin/orders/{uuid}/status"))
            .json(&json!({ "status": "processing" }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_illegal_transition_returns_409() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders.expect_set_status().once().return_once(|_, _| {
            Err(OrdersServiceError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Pending,
            })
        });

        let mut app = mock_app();
        app.orders = Arc::new(orders);

        let service = admin_service(
            app,
            Router::with_path("admin/orders/{uuid}/status").put(status),
        );

        let res = TestClient::put(format!("http://example.com/admin/orders/{uuid}/status"))
            .json(&json!({ "status": "pending" }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_returns_400() -> TestResult {
        let uuid = OrderUuid::new();

        let app = mock_app();

        let service = admin_service(
            app,
            Router::with_path("admin/orders/{uuid}/status").put(status),
        );

        let res = TestClient::put(format!("http://example.com/admin/orders/{uuid}/status"))
            .json(&json!({ "status": "teleported" }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
