//! Book Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_app::domain::books::models::BookFilter;

use crate::{
    books::{errors::into_status_error, handlers::get::BookResponse},
    extensions::*,
    state::State,
};

/// Book Listing Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BooksResponse {
    /// The page of books
    pub books: Vec<BookResponse>,

    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Book Index Handler
///
/// Returns a page of the catalog, newest first.
#[endpoint(tags("books"), summary = "List Books")]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    category: QueryParam<Uuid, false>,
    search: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<BooksResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let page = page_from_params(page, per_page);

    let filter = BookFilter {
        category: category.into_inner().map(Into::into),
        search: search.into_inner().filter(|s| !s.trim().is_empty()),
    };

    let listing = state
        .app
        .books
        .list_books(page, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(BooksResponse {
        meta: PageMeta::from(&listing),
        books: listing.items.into_iter().map(Into::into).collect(),
    }))
}
