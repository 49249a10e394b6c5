//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, TokenConfig},
    database::{self, Db},
    domain::{
        books::{BooksService, PgBooksService},
        categories::{CategoriesService, PgCategoriesService},
        imports::{ImportsService, PgImportsService},
        orders::{OrdersService, PgOrdersService},
        reviews::{PgReviewsService, ReviewsService},
        stats::{PgStatsService, StatsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub books: Arc<dyn BooksService>,
    pub categories: Arc<dyn CategoriesService>,
    pub orders: Arc<dyn OrdersService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub imports: Arc<dyn ImportsService>,
    pub stats: Arc<dyn StatsService>,
}

impl AppContext {
    /// Build application context from a database URL and token settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        tokens: &TokenConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        Ok(Self {
            auth: Arc::new(PgAuthService::new(pool, tokens)),
            books: Arc::new(PgBooksService::new(db.clone())),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            reviews: Arc::new(PgReviewsService::new(db.clone())),
            imports: Arc::new(PgImportsService::new(db.clone())),
            stats: Arc::new(PgStatsService::new(db)),
        })
    }
}
