//! Reviews service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        books::models::BookUuid,
        pagination::{Page, Paginated},
        reviews::{
            errors::ReviewsServiceError,
            models::{MAX_BODY_LENGTH, MAX_TITLE_LENGTH, NewReview, Review, ReviewUpdate, ReviewUuid},
            repository::PgReviewsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgReviewsService {
    db: Db,
    repository: PgReviewsRepository,
}

impl PgReviewsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReviewsRepository::new(),
        }
    }
}

#[async_trait]
impl ReviewsService for PgReviewsService {
    async fn create_review(
        &self,
        user: UserUuid,
        book: BookUuid,
        new_review: NewReview,
    ) -> Result<Review, ReviewsServiceError> {
        validate_review(new_review.rating, &new_review.title, &new_review.body)?;

        let mut tx = self.db.begin().await?;

        if !self.repository.book_exists(&mut tx, book).await? {
            return Err(ReviewsServiceError::BookNotFound);
        }

        let uuid = ReviewUuid::new();

        self.repository
            .create_review(&mut tx, uuid, book, user, &new_review)
            .await?;

        // Aggregates ride in the same transaction as the write they reflect.
        self.repository.refresh_book_rating(&mut tx, book).await?;

        let review = self.repository.get_review(&mut tx, uuid).await?;

        tx.commit().await?;

        Ok(review)
    }

    async fn update_review(
        &self,
        user: UserUuid,
        review: ReviewUuid,
        update: ReviewUpdate,
    ) -> Result<Review, ReviewsServiceError> {
        validate_review(update.rating, &update.title, &update.body)?;

        let mut tx = self.db.begin().await?;

        let book = self
            .repository
            .update_review(&mut tx, review, user, &update)
            .await?
            .ok_or(ReviewsServiceError::NotFound)?;

        self.repository.refresh_book_rating(&mut tx, book).await?;

        let updated = self.repository.get_review(&mut tx, review).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_review(
        &self,
        user: UserUuid,
        review: ReviewUuid,
    ) -> Result<(), ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let book = self
            .repository
            .delete_review(&mut tx, review, user)
            .await?
            .ok_or(ReviewsServiceError::NotFound)?;

        self.repository.refresh_book_rating(&mut tx, book).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_reviews(
        &self,
        book: BookUuid,
        page: Page,
    ) -> Result<Paginated<Review>, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        if !self.repository.book_exists(&mut tx, book).await? {
            return Err(ReviewsServiceError::BookNotFound);
        }

        let reviews = self
            .repository
            .list_reviews(&mut tx, book, page.limit(), page.offset())
            .await?;

        let total = self.repository.count_reviews(&mut tx, book).await?;

        tx.commit().await?;

        Ok(Paginated::new(reviews, page, total.max(0) as u64))
    }
}

#[automock]
#[async_trait]
pub trait ReviewsService: Send + Sync {
    /// Create the caller's review of a book. One review per user per book.
    async fn create_review(
        &self,
        user: UserUuid,
        book: BookUuid,
        new_review: NewReview,
    ) -> Result<Review, ReviewsServiceError>;

    /// Rewrite the caller's own review.
    async fn update_review(
        &self,
        user: UserUuid,
        review: ReviewUuid,
        update: ReviewUpdate,
    ) -> Result<Review, ReviewsServiceError>;

    /// Remove the caller's own review.
    async fn delete_review(
        &self,
        user: UserUuid,
        review: ReviewUuid,
    ) -> Result<(), ReviewsServiceError>;

    /// Reviews of a book, newest first, with author names.
    async fn list_reviews(
        &self,
        book: BookUuid,
        page: Page,
    ) -> Result<Paginated<Review>, ReviewsServiceError>;
}

fn validate_review(rating: u8, title: &str, body: &str) -> Result<(), ReviewsServiceError> {
    if !(1..=5).contains(&rating) {
        return Err(ReviewsServiceError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    if title.trim().is_empty() || title.len() > MAX_TITLE_LENGTH {
        return Err(ReviewsServiceError::Validation(format!(
            "title must be 1 to {MAX_TITLE_LENGTH} characters"
        )));
    }

    if body.trim().is_empty() || body.len() > MAX_BODY_LENGTH {
        return Err(ReviewsServiceError::Validation(format!(
            "body must be 1 to {MAX_BODY_LENGTH} characters"
        )));
    }

    Ok(())
}
