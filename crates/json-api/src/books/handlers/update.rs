//! Update Book Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    books::{
        errors::into_status_error,
        handlers::{BookPayload, get::BookResponse},
    },
    extensions::*,
    state::State,
};

/// Update Book Handler
///
/// Replaces every field of the book, including its category links.
#[endpoint(
    tags("books"),
    summary = "Update Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Book updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Book not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    json: JsonBody<BookPayload>,
    depot: &mut Depot,
) -> Result<Json<BookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let update = json.into_inner().into_book_update()?;

    let book = state
        .app
        .books
        .update_book(book.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(book.into()))
}
