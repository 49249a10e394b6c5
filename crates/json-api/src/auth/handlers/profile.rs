//! Update Profile Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use folio_app::auth::ProfileUpdate;

use crate::{
    auth::{
        errors::into_status_error,
        handlers::{AddressPayload, UserResponse},
    },
    extensions::*,
    state::State,
};

/// Update Profile Request. Absent fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProfileRequest {
    pub name: Option<String>,
    pub address: Option<AddressPayload>,
}

/// Update Profile Handler
#[endpoint(
    tags("auth"),
    summary = "Update profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateProfileRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.auth_user_or_401()?;
    let request = json.into_inner();

    let user = state
        .app
        .auth
        .update_profile(
            identity.uuid,
            ProfileUpdate {
                name: request.name,
                address: request.address.map(Into::into),
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
