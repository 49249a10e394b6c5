//! Bulk import errors.
//!
//! Only document-level problems surface here; individual row failures are
//! folded into the [`ImportSummary`](crate::domain::imports::models::ImportSummary)
//! so that one bad row never aborts the batch.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportsServiceError {
    #[error("a header row is required")]
    MissingHeader,

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ImportsServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
