//! Bulk Import Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use folio_app::domain::imports::{
    ImportsServiceError,
    models::{BookImportRow, CategoryImportRow, ImportKind, ImportSummary},
};

use crate::{extensions::*, state::State};

/// One inline book row.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookRowPayload {
    pub title: String,

    pub authors: Vec<String>,

    pub description: String,

    /// Price in minor units
    #[serde(default)]
    pub price: u64,

    #[serde(default)]
    pub stock: u64,
}

/// One inline category row.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryRowPayload {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// Inline import payload; the variant must match the `{kind}` path segment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InlineImportRequest {
    #[serde(default)]
    pub books: Vec<BookRowPayload>,

    #[serde(default)]
    pub categories: Vec<CategoryRowPayload>,
}

/// Import Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ImportSummaryResponse {
    /// Rows attempted (rows missing required fields are not counted)
    pub total: u64,

    /// Rows inserted
    pub imported: u64,

    /// Up to the first 10 per-row failure messages
    pub errors: Vec<String>,
}

impl From<ImportSummary> for ImportSummaryResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            total: summary.total,
            imported: summary.imported,
            errors: summary.errors,
        }
    }
}

fn into_status_error(error: ImportsServiceError) -> StatusError {
    match error {
        ImportsServiceError::MissingHeader => {
            StatusError::bad_request().brief("A header row is required")
        }
        ImportsServiceError::MissingColumn(column) => {
            StatusError::bad_request().brief(format!("Missing required column: {column}"))
        }
        ImportsServiceError::Sql(source) => {
            error!("import storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Bulk Import Handler
///
/// Accepts either a `file` form upload (delimited text, header row
/// required) or an inline JSON payload of rows. Failed rows are collected
/// per line; one bad row never aborts the batch.
#[endpoint(
    tags("admin"),
    summary = "Bulk Import",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Import finished, see summary"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unusable document or payload"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown import kind"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    kind: PathParam<String>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ImportSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let kind: ImportKind = kind
        .into_inner()
        .parse()
        .map_err(|_| StatusError::not_found().brief("Unknown import kind"))?;

    if let Some(file) = req.file("file").await {
        let path = file.path().to_path_buf();

        let document = tokio::fs::read_to_string(&path)
            .await
            .or_500("failed to read uploaded file")?;

        let summary = match kind {
            ImportKind::Books => state.app.imports.import_books_delimited(document).await,
            ImportKind::Categories => {
                state
                    .app
                    .imports
                    .import_categories_delimited(document)
                    .await
            }
        };

        // The upload is spent either way; losing the unlink is not worth
        // failing the request over.
        if let Err(remove_error) = tokio::fs::remove_file(&path).await {
            warn!("failed to remove uploaded import file: {remove_error}");
        }

        return Ok(Json(summary.map_err(into_status_error)?.into()));
    }

    let inline: InlineImportRequest = req
        .parse_json()
        .await
        .map_err(|_| StatusError::bad_request().brief("Expected a file upload or a JSON body"))?;

    let summary = match kind {
        ImportKind::Books => {
            let rows = inline
                .books
                .into_iter()
                .map(|row| BookImportRow {
                    title: row.title,
                    authors: row.authors,
                    description: row.description,
                    price: row.price,
                    stock: row.stock,
                })
                .collect();

            state.app.imports.import_books(rows).await
        }
        ImportKind::Categories => {
            let rows = inline
                .categories
                .into_iter()
                .map(|row| CategoryImportRow {
                    name: row.name,
                    description: row.description,
                })
                .collect();

            state.app.imports.import_categories(rows).await
        }
    };

    Ok(Json(summary.map_err(into_status_error)?.into()))
}
