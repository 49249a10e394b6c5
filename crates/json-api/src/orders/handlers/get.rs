//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_app::domain::orders::models::{Order, OrderItem};

use crate::{
    auth::handlers::AddressPayload, extensions::*, orders::errors::into_status_error, state::State,
};

/// One frozen order line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,

    /// The book this line was priced from at purchase time
    pub book_uuid: Uuid,

    /// Title snapshot at purchase time
    pub title: String,

    /// Unit price snapshot in minor units
    pub unit_price: u64,

    pub quantity: u32,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            uuid: item.uuid.into(),
            book_uuid: item.book_uuid.into(),
            title: item.title,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// Payment details recorded on an order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentInfoResponse {
    pub method: String,
    pub status: String,
    pub transaction_id: Option<String>,
}

/// Order projection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    pub user_uuid: Uuid,

    pub items: Vec<OrderItemResponse>,

    /// All amounts in minor units
    pub subtotal: u64,

    pub tax: u64,

    pub shipping: u64,

    pub total: u64,

    pub status: String,

    pub payment: PaymentInfoResponse,

    pub shipping_address: AddressPayload,

    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into(),
            user_uuid: order.user_uuid.into(),
            items: order.items.into_iter().map(Into::into).collect(),
            subtotal: order.subtotal,
            tax: order.tax,
            shipping: order.shipping,
            total: order.total,
            status: order.status.as_str().to_string(),
            payment: PaymentInfoResponse {
                method: order.payment.method.as_str().to_string(),
                status: order.payment.status.as_str().to_string(),
                transaction_id: order.payment.transaction_id,
            },
            shipping_address: AddressPayload {
                street: order.shipping_address.street,
                city: order.shipping_address.city,
                state: order.shipping_address.state,
                zip_code: order.shipping_address.zip_code,
                country: order.shipping_address.country,
            },
            created_at: order.created_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Returns one of the caller's own orders; anyone else's reads as absent.
#[endpoint(tags("orders"), summary = "Get Order", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.auth_user_or_401()?;

    let order = state
        .app
        .orders
        .get_order(identity.uuid, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use folio_app::domain::orders::{MockOrdersService, OrdersServiceError, models::OrderUuid};

    use crate::test_helpers::{TEST_USER_UUID, mock_app, sample_order, user_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = mock_app();
        app.orders = Arc::new(orders);

        user_service(app, Router::with_path("orders/{uuid}").get(handler))
    }

    #[tokio::test]
    async fn test_get_own_order_returns_200() -> TestResult {
        let uuid = OrderUuid::new();
        let order = sample_order(uuid);

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |user, o| *user == TEST_USER_UUID && *o == uuid)
            .return_once(move |_, _| Ok(order));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_order_reads_as_404() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
