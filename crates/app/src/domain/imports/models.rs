//! Bulk import models

use std::str::FromStr;

/// How many row errors a summary reports back, at most.
pub const MAX_ERROR_SAMPLES: usize = 10;

/// Target entity of a bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Books,
    Categories,
}

impl ImportKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Categories => "categories",
        }
    }

    /// Canonical example document for this entity, served by the template
    /// endpoint.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Books => {
                "title,authors,description,price,stock\n\
                 The Remains of the Day,Kazuo Ishiguro,A butler looks back on a life of service.,45000,12\n\
                 Convenience Store Woman,Sayaka Murata,Keiko has worked the same register for eighteen years.,32000,8\n"
            }
            Self::Categories => {
                "name,description\n\
                 Literary Fiction,Novels with an emphasis on style and character\n\
                 Biography,Lives told by those who studied them\n"
            }
        }
    }
}

impl FromStr for ImportKind {
    type Err = UnknownImportKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "books" => Ok(Self::Books),
            "categories" => Ok(Self::Categories),
            other => Err(UnknownImportKind(other.to_string())),
        }
    }
}

/// Error for an import kind outside the known set.
#[derive(Debug, thiserror::Error)]
#[error("unknown import kind: {0}")]
pub struct UnknownImportKind(pub String);

/// Outcome of one bulk import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows that entered the attempted set (rows missing required fields
    /// are dropped before this count).
    pub total: u64,

    /// Rows that made it into the database.
    pub imported: u64,

    /// Up to [`MAX_ERROR_SAMPLES`] per-row failure messages.
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub(crate) fn record_failure(&mut self, line: usize, reason: &str) {
        if self.errors.len() < MAX_ERROR_SAMPLES {
            self.errors.push(format!("row {line}: {reason}"));
        }
    }
}

/// One inline book row, as supplied by a structured payload or parsed from a
/// delimited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookImportRow {
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub price: u64,
    pub stock: u64,
}

/// One inline category row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryImportRow {
    pub name: String,
    pub description: String,
}
