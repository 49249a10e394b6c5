//! Orders service.
//!
//! Checkout is the one workflow that touches money and stock across several
//! rows, so the whole write set — validation reads, stock decrements, the
//! order row, and its item snapshots — runs in a single transaction. A
//! failure on any line leaves no trace of the others.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, Order, OrderItem, OrderItemUuid, OrderStatus, OrderUuid},
            pricing::{compute_totals, line_total},
            repository::PgOrdersRepository,
        },
        pagination::{Page, Paginated},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [Order],
    ) -> Result<(), sqlx::Error> {
        if orders.is_empty() {
            return Ok(());
        }

        let uuids: Vec<OrderUuid> = orders.iter().map(|o| o.uuid).collect();

        for (order_uuid, item) in self.repository.get_order_items(tx, &uuids).await? {
            if let Some(order) = orders.iter_mut().find(|o| o.uuid == order_uuid) {
                order.items.push(item);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn place_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        if order.items.iter().any(|item| item.quantity == 0) {
            return Err(OrdersServiceError::InvalidQuantity);
        }

        if let Some(field) = order.shipping_address.first_missing_field() {
            return Err(OrdersServiceError::Validation(format!(
                "shipping address {field} is required"
            )));
        }

        let mut tx = self.db.begin().await?;

        // Validate every line and freeze its snapshot before any mutation.
        // Early returns drop the transaction, rolling everything back.
        let mut items = Vec::with_capacity(order.items.len());

        for line in &order.items {
            let book = self
                .repository
                .get_book_for_checkout(&mut tx, line.book_uuid)
                .await?
                .ok_or(OrdersServiceError::BookNotFound(line.book_uuid.into_uuid()))?;

            if book.stock < u64::from(line.quantity) {
                return Err(OrdersServiceError::InsufficientStock {
                    book: book.uuid.into_uuid(),
                    title: book.title,
                });
            }

            items.push(OrderItem {
                uuid: OrderItemUuid::new(),
                book_uuid: book.uuid,
                title: book.title,
                unit_price: book.price,
                quantity: line.quantity,
            });
        }

        let subtotal = items
            .iter()
            .map(|item| line_total(item.unit_price, item.quantity))
            .sum();

        let totals = compute_totals(subtotal);

        for item in &items {
            // The rows are already locked and checked above; the conditional
            // guard is a second fence against the stock going negative.
            let updated = self
                .repository
                .decrement_stock(&mut tx, item.book_uuid, item.quantity)
                .await?;

            if updated == 0 {
                return Err(OrdersServiceError::InsufficientStock {
                    book: item.book_uuid.into_uuid(),
                    title: item.title.clone(),
                });
            }
        }

        let mut created = self
            .repository
            .create_order(
                &mut tx,
                OrderUuid::new(),
                user,
                &totals,
                order.payment_method,
                &order.shipping_address,
            )
            .await?;

        for item in &items {
            self.repository
                .create_order_item(&mut tx, created.uuid, item)
                .await?;
        }

        tx.commit().await?;

        created.items = items;

        Ok(created)
    }

    async fn list_orders(
        &self,
        user: UserUuid,
        page: Page,
    ) -> Result<Paginated<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self
            .repository
            .list_orders_for_user(&mut tx, user, page.limit(), page.offset())
            .await?;

        let total = self.repository.count_orders_for_user(&mut tx, user).await?;

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(Paginated::new(orders, page, total.max(0) as u64))
    }

    async fn get_order(&self, user: UserUuid, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        // Scoping the lookup by owner means a foreign order is
        // indistinguishable from a missing one.
        let mut order = self
            .repository
            .get_order_for_user(&mut tx, order, user)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        self.attach_items(&mut tx, std::slice::from_mut(&mut order))
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_all_orders(&self, page: Page) -> Result<Paginated<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self
            .repository
            .list_all_orders(&mut tx, page.limit(), page.offset())
            .await?;

        let total = self.repository.count_all_orders(&mut tx).await?;

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(Paginated::new(orders, page, total.max(0) as u64))
    }

    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current: OrderStatus = self
            .repository
            .get_status_for_update(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?
            .parse()
            .map_err(|e| OrdersServiceError::Sql(sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            }))?;

        if !current.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        let mut updated = self.repository.set_status(&mut tx, order, status).await?;

        self.attach_items(&mut tx, std::slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validate, price, and persist an order atomically, decrementing the
    /// stock of every referenced book.
    async fn place_order(&self, user: UserUuid, order: NewOrder)
    -> Result<Order, OrdersServiceError>;

    /// The caller's own orders, newest first.
    async fn list_orders(
        &self,
        user: UserUuid,
        page: Page,
    ) -> Result<Paginated<Order>, OrdersServiceError>;

    /// A single order, only if owned by the caller.
    async fn get_order(&self, user: UserUuid, order: OrderUuid)
    -> Result<Order, OrdersServiceError>;

    /// Every order in the system, newest first.
    async fn list_all_orders(&self, page: Page) -> Result<Paginated<Order>, OrdersServiceError>;

    /// Move an order along the fulfilment chain.
    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            books::{
                BooksService,
                models::{BookUpdate, NewBook},
            },
            orders::{
                models::{NewOrderItem, PaymentMethod, PaymentStatus, ShippingAddress},
                pricing::SHIPPING_FEE,
            },
        },
        test::TestContext,
    };

    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "12 Shelf Lane".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            zip_code: "411001".to_string(),
            country: "IN".to_string(),
        }
    }

    fn order_of(items: Vec<NewOrderItem>) -> NewOrder {
        NewOrder {
            items,
            payment_method: PaymentMethod::Upi,
            shipping_address: address(),
        }
    }

    #[tokio::test]
    async fn place_order_prices_decrements_and_snapshots() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("buyer@example.com").await;

        let book = ctx
            .books
            .create_book(NewBook {
                price: 100_00,
                stock: 5,
                ..TestContext::sample_book("Priced Fairly")
            })
            .await?;

        let order = ctx
            .orders
            .place_order(
                user,
                order_of(vec![NewOrderItem {
                    book_uuid: book.uuid,
                    quantity: 2,
                }]),
            )
            .await?;

        assert_eq!(order.subtotal, 200_00);
        assert_eq!(order.tax, 36_00);
        assert_eq!(order.shipping, SHIPPING_FEE);
        assert_eq!(order.total, 286_00);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment.status, PaymentStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].title, "Priced Fairly");
        assert_eq!(order.items[0].unit_price, 100_00);

        let after = ctx.books.get_book(book.uuid).await?;

        assert_eq!(after.stock, 3, "stock must drop by the ordered quantity");

        Ok(())
    }

    #[tokio::test]
    async fn insufficient_stock_on_a_later_line_mutates_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("careful@example.com").await;

        let in_stock = ctx
            .books
            .create_book(NewBook {
                price: 100_00,
                stock: 5,
                ..TestContext::sample_book("Book A")
            })
            .await?;

        let sold_out = ctx
            .books
            .create_book(NewBook {
                price: 50_00,
                stock: 0,
                ..TestContext::sample_book("Book B")
            })
            .await?;

        let result = ctx
            .orders
            .place_order(
                user,
                order_of(vec![
                    NewOrderItem {
                        book_uuid: in_stock.uuid,
                        quantity: 2,
                    },
                    NewOrderItem {
                        book_uuid: sold_out.uuid,
                        quantity: 1,
                    },
                ]),
            )
            .await;

        match result {
            Err(OrdersServiceError::InsufficientStock { book, title }) => {
                assert_eq!(book, sold_out.uuid.into_uuid());
                assert_eq!(title, "Book B");
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // The first line's stock must be untouched.
        let after = ctx.books.get_book(in_stock.uuid).await?;

        assert_eq!(after.stock, 5, "failed checkout must not decrement stock");

        let orders = ctx.orders.list_orders(user, Page::default()).await?;

        assert_eq!(orders.total, 0, "no order may be recorded on failure");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_book_aborts_the_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("ghost@example.com").await;

        let missing = crate::domain::books::models::BookUuid::new();

        let result = ctx
            .orders
            .place_order(
                user,
                order_of(vec![NewOrderItem {
                    book_uuid: missing,
                    quantity: 1,
                }]),
            )
            .await;

        match result {
            Err(OrdersServiceError::BookNotFound(uuid)) => {
                assert_eq!(uuid, missing.into_uuid(), "the missing id is named");
            }
            other => panic!("expected BookNotFound, got {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn empty_order_is_rejected() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("empty@example.com").await;

        let result = ctx.orders.place_order(user, order_of(vec![])).await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyOrder)),
            "expected EmptyOrder, got {result:?}"
        );
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("zero@example.com").await;

        let book = ctx
            .books
            .create_book(TestContext::sample_book("Zero Copies"))
            .await?;

        let result = ctx
            .orders
            .place_order(
                user,
                order_of(vec![NewOrderItem {
                    book_uuid: book.uuid,
                    quantity: 0,
                }]),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn blank_address_field_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("noaddr@example.com").await;

        let book = ctx
            .books
            .create_book(TestContext::sample_book("Undeliverable"))
            .await?;

        let result = ctx
            .orders
            .place_order(
                user,
                NewOrder {
                    items: vec![NewOrderItem {
                        book_uuid: book.uuid,
                        quantity: 1,
                    }],
                    payment_method: PaymentMethod::CashOnDelivery,
                    shipping_address: ShippingAddress {
                        city: String::new(),
                        ..address()
                    },
                },
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn snapshots_survive_later_catalog_edits() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("archive@example.com").await;

        let book = ctx
            .books
            .create_book(NewBook {
                price: 30_00,
                stock: 4,
                ..TestContext::sample_book("First Edition")
            })
            .await?;

        let placed = ctx
            .orders
            .place_order(
                user,
                order_of(vec![NewOrderItem {
                    book_uuid: book.uuid,
                    quantity: 1,
                }]),
            )
            .await?;

        let sample = TestContext::sample_book("Second Edition");

        ctx.books
            .update_book(
                book.uuid,
                BookUpdate {
                    title: sample.title,
                    authors: sample.authors,
                    description: sample.description,
                    price: 99_00,
                    stock: 4,
                    currency: sample.currency,
                    availability: sample.availability,
                    isbn: None,
                    language: None,
                    format: None,
                    pages: None,
                    publisher: None,
                    categories: vec![],
                },
            )
            .await?;

        let fetched = ctx.orders.get_order(user, placed.uuid).await?;

        assert_eq!(fetched.items[0].title, "First Edition");
        assert_eq!(fetched.items[0].unit_price, 30_00);

        Ok(())
    }

    #[tokio::test]
    async fn orders_are_owner_scoped() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx.register_user("owner@example.com").await;
        let stranger = ctx.register_user("stranger@example.com").await;

        let book = ctx
            .books
            .create_book(TestContext::sample_book("Private Purchase"))
            .await?;

        let placed = ctx
            .orders
            .place_order(
                owner,
                order_of(vec![NewOrderItem {
                    book_uuid: book.uuid,
                    quantity: 1,
                }]),
            )
            .await?;

        let result = ctx.orders.get_order(stranger, placed.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "a foreign order must read as NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_is_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("lister@example.com").await;

        let book = ctx
            .books
            .create_book(NewBook {
                stock: 10,
                ..TestContext::sample_book("Restocked Often")
            })
            .await?;

        let first = ctx
            .orders
            .place_order(
                user,
                order_of(vec![NewOrderItem {
                    book_uuid: book.uuid,
                    quantity: 1,
                }]),
            )
            .await?;

        let second = ctx
            .orders
            .place_order(
                user,
                order_of(vec![NewOrderItem {
                    book_uuid: book.uuid,
                    quantity: 1,
                }]),
            )
            .await?;

        let listing = ctx.orders.list_orders(user, Page::default()).await?;

        assert_eq!(listing.total, 2);
        assert_eq!(listing.items[0].uuid, second.uuid);
        assert_eq!(listing.items[1].uuid, first.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn status_advances_along_the_chain() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("fulfilled@example.com").await;

        let book = ctx
            .books
            .create_book(TestContext::sample_book("On Its Way"))
            .await?;

        let placed = ctx
            .orders
            .place_order(
                user,
                order_of(vec![NewOrderItem {
                    book_uuid: book.uuid,
                    quantity: 1,
                }]),
            )
            .await?;

        let processing = ctx
            .orders
            .set_status(placed.uuid, OrderStatus::Processing)
            .await?;

        assert_eq!(processing.status, OrderStatus::Processing);

        let shipped = ctx
            .orders
            .set_status(placed.uuid, OrderStatus::Shipped)
            .await?;

        assert_eq!(shipped.status, OrderStatus::Shipped);

        Ok(())
    }

    #[tokio::test]
    async fn illegal_transition_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("skipper@example.com").await;

        let book = ctx
            .books
            .create_book(TestContext::sample_book("Not So Fast"))
            .await?;

        let placed = ctx
            .orders
            .place_order(
                user,
                order_of(vec![NewOrderItem {
                    book_uuid: book.uuid,
                    quantity: 1,
                }]),
            )
            .await?;

        let result = ctx
            .orders
            .set_status(placed.uuid, OrderStatus::Delivered)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    from: OrderStatus::Pending,
                    to: OrderStatus::Delivered,
                })
            ),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }
}
