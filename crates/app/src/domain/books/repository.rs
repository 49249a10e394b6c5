//! Books Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    books::models::{Availability, Book, BookCategory, BookFilter, BookUpdate, BookUuid, NewBook},
    categories::models::CategoryUuid,
};

const LIST_BOOKS_SQL: &str = include_str!("sql/list_books.sql");
const COUNT_BOOKS_SQL: &str = include_str!("sql/count_books.sql");
const GET_BOOK_SQL: &str = include_str!("sql/get_book.sql");
const CREATE_BOOK_SQL: &str = include_str!("sql/create_book.sql");
const UPDATE_BOOK_SQL: &str = include_str!("sql/update_book.sql");
const DELETE_BOOK_SQL: &str = include_str!("sql/delete_book.sql");
const LINK_CATEGORY_SQL: &str = include_str!("sql/link_category.sql");
const CLEAR_CATEGORIES_SQL: &str = include_str!("sql/clear_categories.sql");
const GET_CATEGORIES_FOR_BOOKS_SQL: &str = include_str!("sql/get_categories_for_books.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBooksRepository;

impl PgBooksRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_books(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &BookFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Book>, sqlx::Error> {
        query_as::<Postgres, Book>(LIST_BOOKS_SQL)
            .bind(filter.category.map(CategoryUuid::into_uuid))
            .bind(filter.search.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_books(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &BookFilter,
    ) -> Result<i64, sqlx::Error> {
        query_scalar(COUNT_BOOKS_SQL)
            .bind(filter.category.map(CategoryUuid::into_uuid))
            .bind(filter.search.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<Book, sqlx::Error> {
        query_as::<Postgres, Book>(GET_BOOK_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        new_book: &NewBook,
    ) -> Result<Book, sqlx::Error> {
        query_as::<Postgres, Book>(CREATE_BOOK_SQL)
            .bind(book.into_uuid())
            .bind(&new_book.title)
            .bind(&new_book.authors)
            .bind(&new_book.description)
            .bind(to_amount(new_book.price)?)
            .bind(to_amount(new_book.stock)?)
            .bind(&new_book.currency)
            .bind(new_book.availability.as_str())
            .bind(new_book.isbn.as_deref())
            .bind(new_book.language.as_deref())
            .bind(new_book.format.as_deref())
            .bind(new_book.pages.map(i64::from))
            .bind(new_book.publisher.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        update: &BookUpdate,
    ) -> Result<Book, sqlx::Error> {
        query_as::<Postgres, Book>(UPDATE_BOOK_SQL)
            .bind(book.into_uuid())
            .bind(&update.title)
            .bind(&update.authors)
            .bind(&update.description)
            .bind(to_amount(update.price)?)
            .bind(to_amount(update.stock)?)
            .bind(&update.currency)
            .bind(update.availability.as_str())
            .bind(update.isbn.as_deref())
            .bind(update.language.as_deref())
            .bind(update.format.as_deref())
            .bind(update.pages.map(i64::from))
            .bind(update.publisher.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_BOOK_SQL)
            .bind(book.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn link_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        category: CategoryUuid,
    ) -> Result<(), sqlx::Error> {
        query(LINK_CATEGORY_SQL)
            .bind(book.into_uuid())
            .bind(category.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn clear_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<(), sqlx::Error> {
        query(CLEAR_CATEGORIES_SQL)
            .bind(book.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Load category projections for a set of books in one query.
    pub(crate) async fn get_categories_for_books(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        books: &[BookUuid],
    ) -> Result<Vec<(BookUuid, BookCategory)>, sqlx::Error> {
        let uuids: Vec<Uuid> = books.iter().copied().map(BookUuid::into_uuid).collect();

        let rows = query(GET_CATEGORIES_FOR_BOOKS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok((
                    BookUuid::from_uuid(row.try_get("book_uuid")?),
                    BookCategory {
                        uuid: CategoryUuid::from_uuid(row.try_get("uuid")?),
                        name: row.try_get("name")?,
                    },
                ))
            })
            .collect()
    }
}

fn to_amount(value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Book {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let availability_str: String = row.try_get("availability")?;

        let availability =
            Availability::from_str(&availability_str).map_err(|e| sqlx::Error::ColumnDecode {
                index: "availability".to_string(),
                source: Box::new(e),
            })?;

        let pages: Option<i64> = row.try_get("pages")?;

        let pages = pages
            .map(|p| {
                u32::try_from(p).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "pages".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        Ok(Self {
            uuid: BookUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            authors: row.try_get("authors")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_amount(row, "stock")?,
            currency: row.try_get("currency")?,
            availability,
            rating_avg: row.try_get("rating_avg")?,
            rating_count: try_get_amount(row, "rating_count")?,
            isbn: row.try_get("isbn")?,
            language: row.try_get("language")?,
            format: row.try_get("format")?,
            pages,
            publisher: row.try_get("publisher")?,
            categories: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
