//! Current User Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    auth::{errors::into_status_error, handlers::UserResponse},
    extensions::*,
    state::State,
};

/// Current User Handler
///
/// Returns the authenticated user's profile.
#[endpoint(tags("auth"), summary = "Current user", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.auth_user_or_401()?;

    let user = state
        .app
        .auth
        .get_user(identity.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
