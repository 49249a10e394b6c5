//! Books service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        books::{
            errors::BooksServiceError,
            models::{Book, BookFilter, BookUpdate, BookUuid, NewBook},
            repository::PgBooksRepository,
        },
        pagination::{Page, Paginated},
    },
};

#[derive(Debug, Clone)]
pub struct PgBooksService {
    db: Db,
    repository: PgBooksRepository,
}

impl PgBooksService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgBooksRepository::new(),
        }
    }

    async fn attach_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        books: &mut [Book],
    ) -> Result<(), sqlx::Error> {
        if books.is_empty() {
            return Ok(());
        }

        let uuids: Vec<BookUuid> = books.iter().map(|b| b.uuid).collect();

        for (book_uuid, category) in self
            .repository
            .get_categories_for_books(tx, &uuids)
            .await?
        {
            if let Some(book) = books.iter_mut().find(|b| b.uuid == book_uuid) {
                book.categories.push(category);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl BooksService for PgBooksService {
    async fn list_books(
        &self,
        page: Page,
        filter: BookFilter,
    ) -> Result<Paginated<Book>, BooksServiceError> {
        let mut tx = self.db.begin().await?;

        let mut books = self
            .repository
            .list_books(&mut tx, &filter, page.limit(), page.offset())
            .await?;

        let total = self.repository.count_books(&mut tx, &filter).await?;

        self.attach_categories(&mut tx, &mut books).await?;

        tx.commit().await?;

        Ok(Paginated::new(books, page, total.max(0) as u64))
    }

    async fn get_book(&self, book: BookUuid) -> Result<Book, BooksServiceError> {
        let mut tx = self.db.begin().await?;

        let mut book = self.repository.get_book(&mut tx, book).await?;

        self.attach_categories(&mut tx, std::slice::from_mut(&mut book))
            .await?;

        tx.commit().await?;

        Ok(book)
    }

    async fn create_book(&self, new_book: NewBook) -> Result<Book, BooksServiceError> {
        validate_book_fields(&new_book.title, &new_book.authors, &new_book.description)?;

        let mut tx = self.db.begin().await?;

        let mut created = self
            .repository
            .create_book(&mut tx, BookUuid::new(), &new_book)
            .await?;

        for category in &new_book.categories {
            self.repository
                .link_category(&mut tx, created.uuid, *category)
                .await?;
        }

        self.attach_categories(&mut tx, std::slice::from_mut(&mut created))
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_book(
        &self,
        book: BookUuid,
        update: BookUpdate,
    ) -> Result<Book, BooksServiceError> {
        validate_book_fields(&update.title, &update.authors, &update.description)?;

        let mut tx = self.db.begin().await?;

        let mut updated = self.repository.update_book(&mut tx, book, &update).await?;

        self.repository.clear_categories(&mut tx, book).await?;

        for category in &update.categories {
            self.repository
                .link_category(&mut tx, book, *category)
                .await?;
        }

        self.attach_categories(&mut tx, std::slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_book(&self, book: BookUuid) -> Result<(), BooksServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_book(&mut tx, book).await?;

        if rows_affected == 0 {
            return Err(BooksServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait BooksService: Send + Sync {
    /// List the catalog, newest first, with optional category/title filters.
    async fn list_books(
        &self,
        page: Page,
        filter: BookFilter,
    ) -> Result<Paginated<Book>, BooksServiceError>;

    /// Retrieve a single book with its categories.
    async fn get_book(&self, book: BookUuid) -> Result<Book, BooksServiceError>;

    /// Create a book and link its categories.
    async fn create_book(&self, new_book: NewBook) -> Result<Book, BooksServiceError>;

    /// Replace a book's fields and category links.
    async fn update_book(
        &self,
        book: BookUuid,
        update: BookUpdate,
    ) -> Result<Book, BooksServiceError>;

    /// Delete a book from the catalog. Order snapshots are unaffected.
    async fn delete_book(&self, book: BookUuid) -> Result<(), BooksServiceError>;
}

fn validate_book_fields(
    title: &str,
    authors: &[String],
    description: &str,
) -> Result<(), BooksServiceError> {
    if title.trim().is_empty() {
        return Err(BooksServiceError::Validation(
            "title must not be empty".to_string(),
        ));
    }

    if authors.is_empty() || authors.iter().all(|a| a.trim().is_empty()) {
        return Err(BooksServiceError::Validation(
            "at least one author is required".to_string(),
        ));
    }

    if description.trim().is_empty() {
        return Err(BooksServiceError::Validation(
            "description must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            categories::{CategoriesService, models::NewCategory},
            pagination::Page,
        },
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn create_book_returns_created_row() -> TestResult {
        let ctx = TestContext::new().await;

        let book = ctx
            .books
            .create_book(TestContext::sample_book("A Wild Sheep Chase"))
            .await?;

        assert_eq!(book.title, "A Wild Sheep Chase");
        assert_eq!(book.price, 45_00);
        assert_eq!(book.stock, 10);
        assert_eq!(book.rating_count, 0);
        assert!(book.categories.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn create_book_without_authors_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .books
            .create_book(NewBook {
                authors: vec![],
                ..TestContext::sample_book("Anonymous")
            })
            .await;

        assert!(
            matches!(result, Err(BooksServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_book_with_unknown_category_fails() {
        let ctx = TestContext::new().await;

        let result = ctx
            .books
            .create_book(NewBook {
                categories: vec![crate::domain::categories::models::CategoryUuid::new()],
                ..TestContext::sample_book("Uncatalogued")
            })
            .await;

        assert!(
            matches!(result, Err(BooksServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_book_loads_categories() -> TestResult {
        let ctx = TestContext::new().await;

        let category = ctx
            .categories
            .create_category(NewCategory {
                name: "Travel".to_string(),
                description: String::new(),
            })
            .await?;

        let created = ctx
            .books
            .create_book(NewBook {
                categories: vec![category.uuid],
                ..TestContext::sample_book("The Roads to Sata")
            })
            .await?;

        let book = ctx.books.get_book(created.uuid).await?;

        assert_eq!(book.categories.len(), 1);
        assert_eq!(book.categories[0].name, "Travel");

        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_book_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.books.get_book(BookUuid::new()).await;

        assert!(
            matches!(result, Err(BooksServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_books_filters_by_category() -> TestResult {
        let ctx = TestContext::new().await;

        let category = ctx
            .categories
            .create_category(NewCategory {
                name: "Essays".to_string(),
                description: String::new(),
            })
            .await?;

        let tagged = ctx
            .books
            .create_book(NewBook {
                categories: vec![category.uuid],
                ..TestContext::sample_book("Pulphead")
            })
            .await?;

        ctx.books
            .create_book(TestContext::sample_book("Unrelated Novel"))
            .await?;

        let listing = ctx
            .books
            .list_books(
                Page::default(),
                BookFilter {
                    category: Some(category.uuid),
                    search: None,
                },
            )
            .await?;

        assert_eq!(listing.total, 1);
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].uuid, tagged.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn list_books_searches_titles() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.books
            .create_book(TestContext::sample_book("The Sound of Waves"))
            .await?;
        ctx.books
            .create_book(TestContext::sample_book("Silent Spring"))
            .await?;

        let listing = ctx
            .books
            .list_books(
                Page::default(),
                BookFilter {
                    category: None,
                    search: Some("waves".to_string()),
                },
            )
            .await?;

        assert_eq!(listing.total, 1);
        assert_eq!(listing.items[0].title, "The Sound of Waves");

        Ok(())
    }

    #[tokio::test]
    async fn update_book_replaces_category_links() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx
            .categories
            .create_category(NewCategory {
                name: "First".to_string(),
                description: String::new(),
            })
            .await?;

        let second = ctx
            .categories
            .create_category(NewCategory {
                name: "Second".to_string(),
                description: String::new(),
            })
            .await?;

        let created = ctx
            .books
            .create_book(NewBook {
                categories: vec![first.uuid],
                ..TestContext::sample_book("Shifting Shelves")
            })
            .await?;

        let sample = TestContext::sample_book("Shifting Shelves");

        let updated = ctx
            .books
            .update_book(
                created.uuid,
                BookUpdate {
                    title: sample.title,
                    authors: sample.authors,
                    description: sample.description,
                    price: 60_00,
                    stock: 3,
                    currency: sample.currency,
                    availability: sample.availability,
                    isbn: None,
                    language: None,
                    format: None,
                    pages: None,
                    publisher: None,
                    categories: vec![second.uuid],
                },
            )
            .await?;

        assert_eq!(updated.price, 60_00);
        assert_eq!(updated.categories.len(), 1);
        assert_eq!(updated.categories[0].name, "Second");

        Ok(())
    }

    #[tokio::test]
    async fn delete_book_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let book = ctx
            .books
            .create_book(TestContext::sample_book("Short Lived"))
            .await?;

        ctx.books.delete_book(book.uuid).await?;

        let result = ctx.books.get_book(book.uuid).await;

        assert!(
            matches!(result, Err(BooksServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        Ok(())
    }
}
