//! Review Errors

use salvo::http::StatusError;
use tracing::error;

use folio_app::domain::reviews::ReviewsServiceError;

pub(crate) fn into_status_error(error: ReviewsServiceError) -> StatusError {
    match error {
        ReviewsServiceError::AlreadyReviewed => {
            StatusError::conflict().brief("You have already reviewed this book")
        }
        ReviewsServiceError::BookNotFound => StatusError::not_found().brief("Book not found"),
        ReviewsServiceError::NotFound => StatusError::not_found(),
        ReviewsServiceError::Validation(message) => StatusError::bad_request().brief(message),
        ReviewsServiceError::Sql(source) => {
            error!("review storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
