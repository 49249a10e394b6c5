//! Reviews Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::{
        books::models::BookUuid,
        reviews::models::{NewReview, Review, ReviewUpdate, ReviewUuid},
    },
};

const CREATE_REVIEW_SQL: &str = include_str!("sql/create_review.sql");
const GET_REVIEW_SQL: &str = include_str!("sql/get_review.sql");
const UPDATE_REVIEW_SQL: &str = include_str!("sql/update_review.sql");
const DELETE_REVIEW_SQL: &str = include_str!("sql/delete_review.sql");
const LIST_REVIEWS_SQL: &str = include_str!("sql/list_reviews.sql");
const COUNT_REVIEWS_SQL: &str = include_str!("sql/count_reviews.sql");
const BOOK_EXISTS_SQL: &str = include_str!("sql/book_exists.sql");
const REFRESH_BOOK_RATING_SQL: &str = include_str!("sql/refresh_book_rating.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReviewsRepository;

impl PgReviewsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn book_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(BOOK_EXISTS_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
        book: BookUuid,
        user: UserUuid,
        new_review: &NewReview,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_REVIEW_SQL)
            .bind(review.into_uuid())
            .bind(book.into_uuid())
            .bind(user.into_uuid())
            .bind(i16::from(new_review.rating))
            .bind(&new_review.title)
            .bind(&new_review.body)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
    ) -> Result<Review, sqlx::Error> {
        query_as::<Postgres, Review>(GET_REVIEW_SQL)
            .bind(review.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Owner-scoped update; returns the reviewed book when a row matched.
    pub(crate) async fn update_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
        user: UserUuid,
        update: &ReviewUpdate,
    ) -> Result<Option<BookUuid>, sqlx::Error> {
        let book: Option<Uuid> = query_scalar(UPDATE_REVIEW_SQL)
            .bind(review.into_uuid())
            .bind(user.into_uuid())
            .bind(i16::from(update.rating))
            .bind(&update.title)
            .bind(&update.body)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(book.map(BookUuid::from_uuid))
    }

    /// Owner-scoped delete; returns the reviewed book when a row matched.
    pub(crate) async fn delete_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
        user: UserUuid,
    ) -> Result<Option<BookUuid>, sqlx::Error> {
        let book: Option<Uuid> = query_scalar(DELETE_REVIEW_SQL)
            .bind(review.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(book.map(BookUuid::from_uuid))
    }

    pub(crate) async fn list_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        query_as::<Postgres, Review>(LIST_REVIEWS_SQL)
            .bind(book.into_uuid())
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<i64, sqlx::Error> {
        query_scalar(COUNT_REVIEWS_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Recompute the book's rating aggregates from its current reviews.
    pub(crate) async fn refresh_book_rating(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<(), sqlx::Error> {
        query(REFRESH_BOOK_RATING_SQL)
            .bind(book.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for Review {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating_i16: i16 = row.try_get("rating")?;

        let rating = u8::try_from(rating_i16).map_err(|e| sqlx::Error::ColumnDecode {
            index: "rating".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            book_uuid: BookUuid::from_uuid(row.try_get("book_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            author_name: row.try_get("author_name")?,
            rating,
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
