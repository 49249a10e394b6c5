//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use folio_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyOrder => {
            StatusError::bad_request().brief("Order must contain at least one item")
        }
        OrdersServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be at least 1")
        }
        OrdersServiceError::BookNotFound(uuid) => {
            StatusError::not_found().brief(format!("Book {uuid} not found"))
        }
        OrdersServiceError::InsufficientStock { title, .. } => {
            StatusError::bad_request().brief(format!("Insufficient stock for \"{title}\""))
        }
        OrdersServiceError::NotFound => StatusError::not_found(),
        OrdersServiceError::InvalidTransition { from, to } => StatusError::conflict().brief(
            format!("Cannot move order from {} to {}", from.as_str(), to.as_str()),
        ),
        OrdersServiceError::Validation(message) => StatusError::bad_request().brief(message),
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
