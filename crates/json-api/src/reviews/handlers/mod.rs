//! Review handlers and the shapes they share.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_app::domain::reviews::models::Review;

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod update;

/// Review projection with the author's display name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewResponse {
    /// The unique identifier of the review
    pub uuid: Uuid,

    pub book_uuid: Uuid,

    pub author_name: String,

    /// 1 to 5 stars
    pub rating: u8,

    pub title: String,

    pub body: String,

    pub created_at: String,

    pub updated_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            uuid: review.uuid.into(),
            book_uuid: review.book_uuid.into(),
            author_name: review.author_name,
            rating: review.rating,
            title: review.title,
            body: review.body,
            created_at: review.created_at.to_string(),
            updated_at: review.updated_at.to_string(),
        }
    }
}

/// Fields accepted when writing a review.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewPayload {
    /// 1 to 5 stars
    pub rating: u8,

    /// At most 100 characters
    pub title: String,

    /// At most 1000 characters
    pub body: String,
}
