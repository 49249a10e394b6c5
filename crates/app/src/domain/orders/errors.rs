//! Orders service errors.

use sqlx::Error;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::orders::models::OrderStatus;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order must contain at least one item")]
    EmptyOrder,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("book {0} not found")]
    BookNotFound(Uuid),

    #[error("insufficient stock for \"{title}\"")]
    InsufficientStock { book: Uuid, title: String },

    #[error("order not found")]
    NotFound,

    #[error("cannot move order from {from} to {to}", from = .from.as_str(), to = .to.as_str())]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("{0}")]
    Validation(String),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}
