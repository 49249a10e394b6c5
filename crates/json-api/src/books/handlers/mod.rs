//! Catalog handlers and the payloads they share.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_app::domain::books::models::{Availability, BookUpdate, NewBook};

pub(crate) mod categories;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

/// Book fields accepted on create and full update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookPayload {
    pub title: String,

    pub authors: Vec<String>,

    pub description: String,

    /// Price in minor units
    pub price: u64,

    /// Sellable units on hand
    #[serde(default)]
    pub stock: u64,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// `in_stock`, `out_of_stock`, `pre_order`, or `coming_soon`
    #[serde(default = "default_availability")]
    pub availability: String,

    pub isbn: Option<String>,

    pub language: Option<String>,

    pub format: Option<String>,

    pub pages: Option<u32>,

    pub publisher: Option<String>,

    /// Category identifiers the book belongs to
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_availability() -> String {
    Availability::InStock.as_str().to_string()
}

impl BookPayload {
    fn availability(&self) -> Result<Availability, salvo::http::StatusError> {
        self.availability.parse().map_err(|_| {
            salvo::http::StatusError::bad_request().brief("Unknown availability value")
        })
    }

    pub(crate) fn into_new_book(self) -> Result<NewBook, salvo::http::StatusError> {
        let availability = self.availability()?;

        Ok(NewBook {
            title: self.title,
            authors: self.authors,
            description: self.description,
            price: self.price,
            stock: self.stock,
            currency: self.currency,
            availability,
            isbn: self.isbn,
            language: self.language,
            format: self.format,
            pages: self.pages,
            publisher: self.publisher,
            categories: self.categories.into_iter().map(Into::into).collect(),
        })
    }

    pub(crate) fn into_book_update(self) -> Result<BookUpdate, salvo::http::StatusError> {
        let availability = self.availability()?;

        Ok(BookUpdate {
            title: self.title,
            authors: self.authors,
            description: self.description,
            price: self.price,
            stock: self.stock,
            currency: self.currency,
            availability,
            isbn: self.isbn,
            language: self.language,
            format: self.format,
            pages: self.pages,
            publisher: self.publisher,
            categories: self.categories.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_payload(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "authors": ["Test Author"],
        "description": "A testing copy.",
        "price": 45_00,
        "stock": 10,
    })
}
