//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::get::OrderResponse},
    state::State,
};

/// Order History Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// The page of orders, newest first
    pub orders: Vec<OrderResponse>,

    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Order Index Handler
///
/// Returns the caller's own orders, newest first.
#[endpoint(tags("orders"), summary = "List Orders", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.auth_user_or_401()?;
    let page = page_from_params(page, per_page);

    let listing = state
        .app
        .orders
        .list_orders(identity.uuid, page)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        meta: PageMeta::from(&listing),
        orders: listing.items.into_iter().map(Into::into).collect(),
    }))
}
