//! Refresh Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{errors::into_status_error, handlers::TokensResponse},
    extensions::*,
    state::State,
};

/// Refresh Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh Handler
///
/// Exchanges a live refresh token for a rotated pair.
#[endpoint(
    tags("auth"),
    summary = "Refresh tokens",
    responses(
        (status_code = StatusCode::OK, description = "Tokens rotated"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RefreshRequest>,
    depot: &mut Depot,
) -> Result<Json<TokensResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let tokens = state
        .app
        .auth
        .refresh(json.into_inner().refresh_token)
        .await
        .map_err(into_status_error)?;

    Ok(Json(tokens.into()))
}
