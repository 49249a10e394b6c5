//! Book Errors

use salvo::http::StatusError;
use tracing::error;

use folio_app::domain::books::BooksServiceError;

pub(crate) fn into_status_error(error: BooksServiceError) -> StatusError {
    match error {
        BooksServiceError::AlreadyExists => StatusError::conflict().brief("Book already exists"),
        BooksServiceError::NotFound => StatusError::not_found(),
        BooksServiceError::InvalidReference => {
            StatusError::bad_request().brief("Referenced category does not exist")
        }
        BooksServiceError::MissingRequiredData | BooksServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid book payload")
        }
        BooksServiceError::Validation(message) => StatusError::bad_request().brief(message),
        BooksServiceError::Sql(source) => {
            error!("book storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
