//! Place Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_app::domain::orders::models::{NewOrder, NewOrderItem, PaymentMethod, ShippingAddress};

use crate::{
    auth::handlers::AddressPayload,
    extensions::*,
    orders::{errors::into_status_error, handlers::get::OrderResponse},
    state::State,
};

/// One requested order line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderItem {
    /// The book to order
    pub book_uuid: Uuid,

    /// Copies requested, at least 1
    pub quantity: u32,
}

/// Place Order Request. Prices come from the catalog, never from here.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    pub items: Vec<PlaceOrderItem>,

    /// `credit_card`, `debit_card`, `upi`, `net_banking`, or `cash_on_delivery`
    pub payment_method: String,

    pub shipping_address: AddressPayload,
}

/// Place Order Handler
///
/// Validates availability, prices the cart server-side, decrements stock,
/// and records the order — atomically.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid cart or insufficient stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Referenced book not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.auth_user_or_401()?;
    let request = json.into_inner();

    let payment_method: PaymentMethod = request
        .payment_method
        .parse()
        .map_err(|_| StatusError::bad_request().brief("Unknown payment method"))?;

    let order = NewOrder {
        items: request
            .items
            .into_iter()
            .map(|item| NewOrderItem {
                book_uuid: item.book_uuid.into(),
                quantity: item.quantity,
            })
            .collect(),
        payment_method,
        shipping_address: ShippingAddress {
            street: request.shipping_address.street,
            city: request.shipping_address.city,
            state: request.shipping_address.state,
            zip_code: request.shipping_address.zip_code,
            country: request.shipping_address.country,
        },
    };

    let placed = state
        .app
        .orders
        .place_order(identity.uuid, order)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", placed.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(placed.into()))
}
