//! Book Reviews Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    reviews::{errors::into_status_error, handlers::ReviewResponse},
    state::State,
};

/// Book Reviews Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewsResponse {
    /// The page of reviews, newest first
    pub reviews: Vec<ReviewResponse>,

    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Book Reviews Index Handler
///
/// Returns a book's reviews, newest first, with author names.
#[endpoint(tags("reviews"), summary = "List Book Reviews")]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ReviewsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let page = page_from_params(page, per_page);

    let listing = state
        .app
        .reviews
        .list_reviews(book.into_inner().into(), page)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ReviewsResponse {
        meta: PageMeta::from(&listing),
        reviews: listing.items.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use folio_app::domain::{
        books::models::BookUuid,
        pagination::Paginated,
        reviews::{MockReviewsService, ReviewsServiceError, models::ReviewUuid},
    };

    use crate::test_helpers::{mock_app, sample_review, service_with_state};

    use super::*;

    fn make_service(reviews: MockReviewsService) -> Service {
        let mut app = mock_app();
        app.reviews = Arc::new(reviews);

        service_with_state(app, Router::with_path("reviews/book/{uuid}").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_reviews_with_authors() -> TestResult {
        let book = BookUuid::new();

        let mut reviews = MockReviewsService::new();

        reviews
            .expect_list_reviews()
            .once()
            .withf(move |b, _| *b == book)
            .return_once(|_, page| {
                Ok(Paginated::new(vec![sample_review(ReviewUuid::new())], page, 1))
            });

        let mut res = TestClient::get(format!("http://example.com/reviews/book/{book}"))
            .send(&make_service(reviews))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ReviewsResponse = res.take_json().await?;

        assert_eq!(body.reviews.len(), 1);
        assert!(!body.reviews[0].author_name.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_unknown_book_returns_404() -> TestResult {
        let book = BookUuid::new();

        let mut reviews = MockReviewsService::new();

        reviews
            .expect_list_reviews()
            .once()
            .return_once(|_, _| Err(ReviewsServiceError::BookNotFound));

        let res = TestClient::get(format!("http://example.com/reviews/book/{book}"))
            .send(&make_service(reviews))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
