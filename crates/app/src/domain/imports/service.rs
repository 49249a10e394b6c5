//! Bulk import service.
//!
//! Every row runs in its own transaction: a duplicate or otherwise failing
//! row is recorded against its line number and the batch carries on.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        books::{
            PgBooksRepository,
            errors::BooksServiceError,
            models::{Availability, BookUuid, NewBook},
        },
        categories::{
            PgCategoriesRepository,
            errors::CategoriesServiceError,
            models::{CategoryUuid, NewCategory},
        },
        imports::{
            errors::ImportsServiceError,
            models::{BookImportRow, CategoryImportRow, ImportSummary},
            rows::{RowOutcome, book_rows, category_rows, parse_table},
        },
    },
};

const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone)]
pub struct PgImportsService {
    db: Db,
    books: PgBooksRepository,
    categories: PgCategoriesRepository,
}

impl PgImportsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            books: PgBooksRepository::new(),
            categories: PgCategoriesRepository::new(),
        }
    }

    async fn insert_book(&self, row: &BookImportRow) -> Result<(), String> {
        let new_book = NewBook {
            title: row.title.clone(),
            authors: row.authors.clone(),
            description: row.description.clone(),
            price: row.price,
            stock: row.stock,
            currency: DEFAULT_CURRENCY.to_string(),
            availability: Availability::InStock,
            isbn: None,
            language: None,
            format: None,
            pages: None,
            publisher: None,
            categories: Vec::new(),
        };

        let result: Result<(), sqlx::Error> = async {
            let mut tx = self.db.begin().await?;

            self.books
                .create_book(&mut tx, BookUuid::new(), &new_book)
                .await?;

            tx.commit().await?;

            Ok(())
        }
        .await;

        result.map_err(|e| BooksServiceError::from(e).to_string())
    }

    async fn insert_category(&self, row: &CategoryImportRow) -> Result<(), String> {
        let new_category = NewCategory {
            name: row.name.clone(),
            description: row.description.clone(),
        };

        let result: Result<(), sqlx::Error> = async {
            let mut tx = self.db.begin().await?;

            self.categories
                .create_category(&mut tx, CategoryUuid::new(), &new_category)
                .await?;

            tx.commit().await?;

            Ok(())
        }
        .await;

        result.map_err(|e| CategoriesServiceError::from(e).to_string())
    }

    async fn run_books(
        &self,
        rows: Vec<(usize, RowOutcome<BookImportRow>)>,
    ) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for (line_no, outcome) in rows {
            summary.total += 1;

            match outcome {
                RowOutcome::Ready(row) => match self.insert_book(&row).await {
                    Ok(()) => summary.imported += 1,
                    Err(reason) => summary.record_failure(line_no, &reason),
                },
                RowOutcome::Malformed(reason) => summary.record_failure(line_no, &reason),
            }
        }

        info!(
            total = summary.total,
            imported = summary.imported,
            "book import finished"
        );

        summary
    }

    async fn run_categories(
        &self,
        rows: Vec<(usize, RowOutcome<CategoryImportRow>)>,
    ) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for (line_no, outcome) in rows {
            summary.total += 1;

            match outcome {
                RowOutcome::Ready(row) => match self.insert_category(&row).await {
                    Ok(()) => summary.imported += 1,
                    Err(reason) => summary.record_failure(line_no, &reason),
                },
                RowOutcome::Malformed(reason) => summary.record_failure(line_no, &reason),
            }
        }

        info!(
            total = summary.total,
            imported = summary.imported,
            "category import finished"
        );

        summary
    }
}

#[async_trait]
impl ImportsService for PgImportsService {
    async fn import_books_delimited(
        &self,
        document: String,
    ) -> Result<ImportSummary, ImportsServiceError> {
        let table = parse_table(&document)?;
        let rows = book_rows(&table)?;

        Ok(self.run_books(rows).await)
    }

    async fn import_categories_delimited(
        &self,
        document: String,
    ) -> Result<ImportSummary, ImportsServiceError> {
        let table = parse_table(&document)?;
        let rows = category_rows(&table)?;

        Ok(self.run_categories(rows).await)
    }

    async fn import_books(
        &self,
        rows: Vec<BookImportRow>,
    ) -> Result<ImportSummary, ImportsServiceError> {
        let rows = rows
            .into_iter()
            .enumerate()
            .filter(|(_, row)| {
                !row.title.trim().is_empty()
                    && !row.authors.is_empty()
                    && !row.description.trim().is_empty()
            })
            .map(|(index, row)| (index + 1, RowOutcome::Ready(row)))
            .collect();

        Ok(self.run_books(rows).await)
    }

    async fn import_categories(
        &self,
        rows: Vec<CategoryImportRow>,
    ) -> Result<ImportSummary, ImportsServiceError> {
        let rows = rows
            .into_iter()
            .enumerate()
            .filter(|(_, row)| !row.name.trim().is_empty())
            .map(|(index, row)| (index + 1, RowOutcome::Ready(row)))
            .collect();

        Ok(self.run_categories(rows).await)
    }
}

#[automock]
#[async_trait]
pub trait ImportsService: Send + Sync {
    /// Import books from a delimited document with a header row.
    async fn import_books_delimited(
        &self,
        document: String,
    ) -> Result<ImportSummary, ImportsServiceError>;

    /// Import categories from a delimited document with a header row.
    async fn import_categories_delimited(
        &self,
        document: String,
    ) -> Result<ImportSummary, ImportsServiceError>;

    /// Import books from an inline structured payload.
    async fn import_books(
        &self,
        rows: Vec<BookImportRow>,
    ) -> Result<ImportSummary, ImportsServiceError>;

    /// Import categories from an inline structured payload.
    async fn import_categories(
        &self,
        rows: Vec<CategoryImportRow>,
    ) -> Result<ImportSummary, ImportsServiceError>;
}
