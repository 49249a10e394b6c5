//! Public Stats Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Public Stats Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PublicStatsResponse {
    pub books: u64,
    pub categories: u64,
}

/// Public Stats Handler
///
/// Counters safe to show without authentication.
#[endpoint(tags("stats"), summary = "Public Stats")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PublicStatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .stats
        .public_stats()
        .await
        .or_500("failed to compute public stats")?;

    Ok(Json(PublicStatsResponse {
        books: stats.books,
        categories: stats.categories,
    }))
}
