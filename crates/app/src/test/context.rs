//! Test context for service-level integration tests.

use crate::{
    auth::{AuthService, NewUser, PgAuthService, TokenConfig, UserUuid},
    database::Db,
    domain::{
        books::{PgBooksService, models::{Availability, NewBook}},
        categories::PgCategoriesService,
        imports::PgImportsService,
        orders::PgOrdersService,
        reviews::PgReviewsService,
        stats::PgStatsService,
    },
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub auth: PgAuthService,
    pub books: PgBooksService,
    pub categories: PgCategoriesService,
    pub orders: PgOrdersService,
    pub reviews: PgReviewsService,
    pub imports: PgImportsService,
    pub stats: PgStatsService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let tokens = TokenConfig {
            secret: "test-signing-secret".to_string(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 604_800,
        };

        Self {
            auth: PgAuthService::new(test_db.pool().clone(), &tokens),
            books: PgBooksService::new(db.clone()),
            categories: PgCategoriesService::new(db.clone()),
            orders: PgOrdersService::new(db.clone()),
            reviews: PgReviewsService::new(db.clone()),
            imports: PgImportsService::new(db.clone()),
            stats: PgStatsService::new(db),
            db: test_db,
        }
    }

    /// Register a user and return their id.
    pub async fn register_user(&self, email: &str) -> UserUuid {
        let (user, _) = self
            .auth
            .register(NewUser {
                name: "Test Reader".to_string(),
                email: email.to_string(),
                password: "a sound passphrase".to_string(),
            })
            .await
            .expect("Failed to register test user");

        user.uuid
    }

    /// A minimal valid book with the given title.
    pub fn sample_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            authors: vec!["Test Author".to_string()],
            description: "A book that exists for testing purposes.".to_string(),
            price: 45_00,
            stock: 10,
            currency: "INR".to_string(),
            availability: Availability::InStock,
            isbn: None,
            language: None,
            format: None,
            pages: None,
            publisher: None,
            categories: Vec::new(),
        }
    }
}
