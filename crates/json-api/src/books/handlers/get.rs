//! Get Book Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_app::domain::books::models::{Book, BookCategory};

use crate::{books::errors::into_status_error, extensions::*, state::State};

/// Category projection on a book.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookCategoryResponse {
    pub uuid: Uuid,
    pub name: String,
}

impl From<BookCategory> for BookCategoryResponse {
    fn from(category: BookCategory) -> Self {
        Self {
            uuid: category.uuid.into(),
            name: category.name,
        }
    }
}

/// Book projection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookResponse {
    /// The unique identifier of the book
    pub uuid: Uuid,

    pub title: String,

    pub authors: Vec<String>,

    pub description: String,

    /// Current price in minor units
    pub price: u64,

    /// Sellable units on hand
    pub stock: u64,

    pub currency: String,

    /// Catalog disposition, independent of numeric stock
    pub availability: String,

    pub rating_avg: f64,

    pub rating_count: u64,

    pub isbn: Option<String>,

    pub language: Option<String>,

    pub format: Option<String>,

    pub pages: Option<u32>,

    pub publisher: Option<String>,

    pub categories: Vec<BookCategoryResponse>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            uuid: book.uuid.into(),
            title: book.title,
            authors: book.authors,
            description: book.description,
            price: book.price,
            stock: book.stock,
            currency: book.currency,
            availability: book.availability.as_str().to_string(),
            rating_avg: book.rating_avg,
            rating_count: book.rating_count,
            isbn: book.isbn,
            language: book.language,
            format: book.format,
            pages: book.pages,
            publisher: book.publisher,
            categories: book.categories.into_iter().map(Into::into).collect(),
            created_at: book.created_at.to_string(),
            updated_at: book.updated_at.to_string(),
        }
    }
}

/// Get Book Handler
///
/// Returns a book with its categories.
#[endpoint(tags("books"), summary = "Get Book")]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<BookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let book = state
        .app
        .books
        .get_book(book.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(book.into()))
}
