//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use folio_app::auth::Credentials;

use crate::{
    auth::{
        errors::into_status_error,
        handlers::{TokensResponse, UserResponse},
    },
    extensions::*,
    state::State,
};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Logged In Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoggedInResponse {
    pub user: UserResponse,
    pub tokens: TokensResponse,
}

/// Login Handler
#[endpoint(
    tags("auth"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Session opened"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<LoggedInResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let (user, tokens) = state
        .app
        .auth
        .login(Credentials {
            email: request.email,
            password: request.password,
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(LoggedInResponse {
        user: user.into(),
        tokens: tokens.into(),
    }))
}
