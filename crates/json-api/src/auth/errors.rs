//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use folio_app::auth::AuthServiceError;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::AlreadyExists => {
            StatusError::conflict().brief("Email is already registered")
        }
        AuthServiceError::NotFound => StatusError::not_found(),
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::InvalidToken => {
            StatusError::unauthorized().brief("Invalid or expired token")
        }
        AuthServiceError::Validation(message) => StatusError::bad_request().brief(message),
        AuthServiceError::Password(source) => {
            error!("password processing failed: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Signing(source) => {
            error!("token signing failed: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Sql(source) => {
            error!("auth storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
