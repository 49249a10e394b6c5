//! Review Models

use jiff::Timestamp;

use crate::{auth::UserUuid, domain::books::models::BookUuid, uuids::TypedUuid};

/// Review UUID
pub type ReviewUuid = TypedUuid<Review>;

/// Longest accepted review title.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Longest accepted review body.
pub const MAX_BODY_LENGTH: usize = 1000;

/// Review Model, with the author's display name projected for listings.
#[derive(Debug, Clone)]
pub struct Review {
    pub uuid: ReviewUuid,
    pub book_uuid: BookUuid,
    pub user_uuid: UserUuid,
    pub author_name: String,
    pub rating: u8,
    pub title: String,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Review Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub rating: u8,
    pub title: String,
    pub body: String,
}

/// Review Update Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub rating: u8,
    pub title: String,
    pub body: String,
}
