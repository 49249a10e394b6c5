//! Update Review Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use folio_app::domain::reviews::models::ReviewUpdate;

use crate::{
    extensions::*,
    reviews::{
        errors::into_status_error,
        handlers::{ReviewPayload, ReviewResponse},
    },
    state::State,
};

/// Update Review Handler
///
/// Only the review's author may rewrite it; anyone else sees 404.
#[endpoint(
    tags("reviews"),
    summary = "Update Review",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Review updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Review not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    review: PathParam<Uuid>,
    json: JsonBody<ReviewPayload>,
    depot: &mut Depot,
) -> Result<Json<ReviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.auth_user_or_401()?;
    let payload = json.into_inner();

    let review = state
        .app
        .reviews
        .update_review(
            identity.uuid,
            review.into_inner().into(),
            ReviewUpdate {
                rating: payload.rating,
                title: payload.title,
                body: payload.body,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(review.into()))
}
