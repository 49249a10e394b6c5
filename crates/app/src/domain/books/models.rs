//! Book Models

use std::str::FromStr;

use jiff::Timestamp;

use crate::{domain::categories::models::CategoryUuid, uuids::TypedUuid};

/// Book UUID
pub type BookUuid = TypedUuid<Book>;

/// Catalog disposition of a book, independent of its numeric stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    InStock,
    OutOfStock,
    PreOrder,
    ComingSoon,
}

impl Availability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
            Self::PreOrder => "pre_order",
            Self::ComingSoon => "coming_soon",
        }
    }
}

impl FromStr for Availability {
    type Err = UnknownAvailability;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "in_stock" => Ok(Self::InStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            "pre_order" => Ok(Self::PreOrder),
            "coming_soon" => Ok(Self::ComingSoon),
            other => Err(UnknownAvailability(other.to_string())),
        }
    }
}

/// Error for an availability string outside the known set.
#[derive(Debug, thiserror::Error)]
#[error("unknown availability: {0}")]
pub struct UnknownAvailability(pub String);

/// A category a book belongs to, projected for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCategory {
    pub uuid: CategoryUuid,
    pub name: String,
}

/// Book Model
#[derive(Debug, Clone)]
pub struct Book {
    pub uuid: BookUuid,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    /// Current price in minor units.
    pub price: u64,
    /// Sellable units currently available.
    pub stock: u64,
    pub currency: String,
    pub availability: Availability,
    pub rating_avg: f64,
    pub rating_count: u64,
    pub isbn: Option<String>,
    pub language: Option<String>,
    pub format: Option<String>,
    pub pages: Option<u32>,
    pub publisher: Option<String>,
    pub categories: Vec<BookCategory>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Book Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub price: u64,
    pub stock: u64,
    pub currency: String,
    pub availability: Availability,
    pub isbn: Option<String>,
    pub language: Option<String>,
    pub format: Option<String>,
    pub pages: Option<u32>,
    pub publisher: Option<String>,
    pub categories: Vec<CategoryUuid>,
}

/// Book Update Model. Replaces the whole record (PUT semantics);
/// rating aggregates are owned by the review workflow and untouched here.
#[derive(Debug, Clone, PartialEq)]
pub struct BookUpdate {
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub price: u64,
    pub stock: u64,
    pub currency: String,
    pub availability: Availability,
    pub isbn: Option<String>,
    pub language: Option<String>,
    pub format: Option<String>,
    pub pages: Option<u32>,
    pub publisher: Option<String>,
    pub categories: Vec<CategoryUuid>,
}

/// Filters applied to the catalog listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub category: Option<CategoryUuid>,
    pub search: Option<String>,
}
