//! Depot helper extensions.

use std::any::Any;

use folio_app::auth::AuthenticatedUser;
use salvo::prelude::{Depot, StatusError};

const AUTH_USER_KEY: &str = "auth_user";

/// Helpers for mapping depot extraction failures to HTTP errors and for
/// carrying the request identity between middleware and handlers.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_auth_user(&mut self, user: AuthenticatedUser);

    fn auth_user_or_401(&self) -> Result<AuthenticatedUser, StatusError>;

    fn admin_or_403(&self) -> Result<AuthenticatedUser, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_auth_user(&mut self, user: AuthenticatedUser) {
        self.insert(AUTH_USER_KEY, user);
    }

    fn auth_user_or_401(&self) -> Result<AuthenticatedUser, StatusError> {
        self.get::<AuthenticatedUser>(AUTH_USER_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }

    fn admin_or_403(&self) -> Result<AuthenticatedUser, StatusError> {
        let user = self.auth_user_or_401()?;

        if !user.is_admin() {
            return Err(StatusError::forbidden().brief("Administrator access required"));
        }

        Ok(user)
    }
}
