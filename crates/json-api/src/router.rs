//! App Router

use salvo::Router;

use crate::{admin, auth, books, healthcheck, orders, reviews, stats};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("public/stats").get(stats::handler))
        .push(auth_router())
        .push(books_router())
        .push(orders_router())
        .push(reviews_router())
        .push(admin_router())
}

fn auth_router() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("register").post(auth::handlers::register::handler))
        .push(Router::with_path("login").post(auth::handlers::login::handler))
        .push(Router::with_path("refresh").post(auth::handlers::refresh::handler))
        .push(Router::with_path("logout").post(auth::handlers::logout::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(Router::with_path("me").get(auth::handlers::me::handler))
                .push(Router::with_path("profile").put(auth::handlers::profile::handler))
                .push(Router::with_path("password").put(auth::handlers::password::handler)),
        )
}

fn books_router() -> Router {
    Router::with_path("books")
        .get(books::handlers::index::handler)
        .push(Router::with_path("meta/categories").get(books::handlers::categories::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .hoop(auth::middleware::admin_only)
                .post(books::handlers::create::handler)
                .push(
                    Router::with_path("{uuid}")
                        .put(books::handlers::update::handler)
                        .delete(books::handlers::delete::handler),
                ),
        )
        .push(Router::with_path("{uuid}").get(books::handlers::get::handler))
}

fn orders_router() -> Router {
    Router::with_path("orders")
        .hoop(auth::middleware::handler)
        .post(orders::handlers::create::handler)
        .get(orders::handlers::index::handler)
        .push(Router::with_path("{uuid}").get(orders::handlers::get::handler))
}

fn reviews_router() -> Router {
    Router::with_path("reviews")
        .push(Router::with_path("book/{uuid}").get(reviews::handlers::index::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("{uuid}")
                        .post(reviews::handlers::create::handler)
                        .put(reviews::handlers::update::handler)
                        .delete(reviews::handlers::delete::handler),
                ),
        )
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .hoop(auth::middleware::handler)
        .hoop(auth::middleware::admin_only)
        .push(Router::with_path("stats").get(admin::stats::handler))
        .push(
            Router::with_path("orders")
                .get(admin::orders::index)
                .push(Router::with_path("{uuid}/status").put(admin::orders::status)),
        )
        .push(Router::with_path("users").get(admin::users::index))
        .push(
            Router::with_path("categories")
                .get(admin::categories::index)
                .post(admin::categories::create)
                .push(
                    Router::with_path("{uuid}")
                        .put(admin::categories::update)
                        .delete(admin::categories::delete),
                ),
        )
        .push(Router::with_path("bulk-import/{kind}").post(admin::imports::handler))
        .push(Router::with_path("template/{kind}").get(admin::template::handler))
}
