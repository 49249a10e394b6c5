//! Stats service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};
use thiserror::Error;

use crate::{
    database::Db,
    domain::stats::models::{AdminStats, PublicStats},
};

const ADMIN_STATS_SQL: &str = include_str!("sql/admin_stats.sql");
const PUBLIC_STATS_SQL: &str = include_str!("sql/public_stats.sql");

#[derive(Debug, Error)]
pub enum StatsServiceError {
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct PgStatsService {
    db: Db,
}

impl PgStatsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsService for PgStatsService {
    async fn admin_stats(&self) -> Result<AdminStats, StatsServiceError> {
        let stats = query_as::<Postgres, AdminStats>(ADMIN_STATS_SQL)
            .fetch_one(self.db.pool())
            .await?;

        Ok(stats)
    }

    async fn public_stats(&self) -> Result<PublicStats, StatsServiceError> {
        let stats = query_as::<Postgres, PublicStats>(PUBLIC_STATS_SQL)
            .fetch_one(self.db.pool())
            .await?;

        Ok(stats)
    }
}

#[automock]
#[async_trait]
pub trait StatsService: Send + Sync {
    /// Counters for the admin dashboard.
    async fn admin_stats(&self) -> Result<AdminStats, StatsServiceError>;

    /// Counters safe to show without authentication.
    async fn public_stats(&self) -> Result<PublicStats, StatsServiceError>;
}

fn count(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let value: i64 = row.try_get(col)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for AdminStats {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            books: count(row, "books")?,
            users: count(row, "users")?,
            orders: count(row, "orders")?,
            revenue: count(row, "revenue")?,
            pending_orders: count(row, "pending_orders")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PublicStats {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            books: count(row, "books")?,
            categories: count(row, "categories")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            books::BooksService,
            orders::{
                OrdersService,
                models::{NewOrder, NewOrderItem, PaymentMethod, ShippingAddress},
            },
        },
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn empty_database_reports_zeroes() -> TestResult {
        let ctx = TestContext::new().await;

        let stats = ctx.stats.admin_stats().await?;

        assert_eq!(stats.books, 0);
        assert_eq!(stats.orders, 0);
        assert_eq!(stats.revenue, 0);

        Ok(())
    }

    #[tokio::test]
    async fn revenue_tracks_placed_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("spender@example.com").await;

        let book = ctx
            .books
            .create_book(crate::test::TestContext::sample_book("Countable"))
            .await?;

        let order = ctx
            .orders
            .place_order(
                user,
                NewOrder {
                    items: vec![NewOrderItem {
                        book_uuid: book.uuid,
                        quantity: 1,
                    }],
                    payment_method: PaymentMethod::Upi,
                    shipping_address: ShippingAddress {
                        street: "12 Shelf Lane".to_string(),
                        city: "Pune".to_string(),
                        state: "MH".to_string(),
                        zip_code: "411001".to_string(),
                        country: "IN".to_string(),
                    },
                },
            )
            .await?;

        let stats = ctx.stats.admin_stats().await?;

        assert_eq!(stats.orders, 1);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.revenue, order.total);

        let public = ctx.stats.public_stats().await?;

        assert_eq!(public.books, 1);

        Ok(())
    }
}
