//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use folio_app::{
    auth::{AuthenticatedUser, MockAuthService, TokenPair, User, UserRole, UserUuid},
    context::AppContext,
    domain::{
        books::{MockBooksService, models::{Availability, Book, BookUuid}},
        categories::{MockCategoriesService, models::{Category, CategoryUuid}},
        imports::MockImportsService,
        orders::{
            MockOrdersService,
            models::{
                Order, OrderItem, OrderItemUuid, OrderStatus, OrderUuid, PaymentInfo,
                PaymentMethod, PaymentStatus, ShippingAddress,
            },
        },
        reviews::{MockReviewsService, models::{Review, ReviewUuid}},
        stats::MockStatsService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// An app context where every service is a fresh mock. Tests replace the
/// services they exercise; any call into the others panics.
pub(crate) fn mock_app() -> AppContext {
    AppContext {
        auth: Arc::new(MockAuthService::new()),
        books: Arc::new(MockBooksService::new()),
        categories: Arc::new(MockCategoriesService::new()),
        orders: Arc::new(MockOrdersService::new()),
        reviews: Arc::new(MockReviewsService::new()),
        imports: Arc::new(MockImportsService::new()),
        stats: Arc::new(MockStatsService::new()),
    }
}

pub(crate) fn state_from(app: AppContext) -> Arc<State> {
    Arc::new(State::new(app))
}

/// Pretend the auth middleware already ran for a plain user.
#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_auth_user(AuthenticatedUser {
        uuid: TEST_USER_UUID,
        role: UserRole::User,
    });
    ctrl.call_next(req, depot, res).await;
}

/// Pretend the auth middleware already ran for an administrator.
#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_auth_user(AuthenticatedUser {
        uuid: TEST_USER_UUID,
        role: UserRole::Admin,
    });
    ctrl.call_next(req, depot, res).await;
}

/// A service with state but no request identity.
pub(crate) fn service_with_state(app: AppContext, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state_from(app))).push(route))
}

/// A service whose requests carry a plain-user identity.
pub(crate) fn user_service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_from(app)))
            .hoop(inject_user)
            .push(route),
    )
}

/// A service whose requests carry an admin identity.
pub(crate) fn admin_service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_from(app)))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn sample_user() -> User {
    User {
        uuid: TEST_USER_UUID,
        name: "Avid Reader".to_string(),
        email: "reader@example.com".to_string(),
        role: UserRole::User,
        address: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn token_pair() -> TokenPair {
    TokenPair {
        access_token: "access.jwt".to_string(),
        refresh_token: "refresh.jwt".to_string(),
        access_expires_in: 900,
        refresh_expires_in: 604_800,
    }
}

pub(crate) fn sample_book(uuid: BookUuid) -> Book {
    Book {
        uuid,
        title: "The Hollow Crown".to_string(),
        authors: vec!["Test Author".to_string()],
        description: "A testing copy.".to_string(),
        price: 45_00,
        stock: 10,
        currency: "INR".to_string(),
        availability: Availability::InStock,
        rating_avg: 0.0,
        rating_count: 0,
        isbn: None,
        language: None,
        format: None,
        pages: None,
        publisher: None,
        categories: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn sample_category(name: &str) -> Category {
    Category {
        uuid: CategoryUuid::new(),
        name: name.to_string(),
        description: format!("{name} books"),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn sample_order(uuid: OrderUuid) -> Order {
    Order {
        uuid,
        user_uuid: TEST_USER_UUID,
        items: vec![OrderItem {
            uuid: OrderItemUuid::new(),
            book_uuid: BookUuid::new(),
            title: "The Hollow Crown".to_string(),
            unit_price: 100_00,
            quantity: 2,
        }],
        subtotal: 200_00,
        tax: 36_00,
        shipping: 50_00,
        total: 286_00,
        status: OrderStatus::Pending,
        payment: PaymentInfo {
            method: PaymentMethod::Upi,
            status: PaymentStatus::Pending,
            transaction_id: None,
        },
        shipping_address: ShippingAddress {
            street: "12 Shelf Lane".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            zip_code: "411001".to_string(),
            country: "IN".to_string(),
        },
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn sample_review(uuid: ReviewUuid) -> Review {
    Review {
        uuid,
        book_uuid: BookUuid::new(),
        user_uuid: TEST_USER_UUID,
        author_name: "Avid Reader".to_string(),
        rating: 4,
        title: "Well bound".to_string(),
        body: "Held together through three readings.".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
