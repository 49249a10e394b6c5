//! Pagination helpers shared by list endpoints.

use folio_app::domain::pagination::{DEFAULT_PER_PAGE, Page, Paginated};
use salvo::oapi::{ToSchema, extract::QueryParam};
use serde::{Deserialize, Serialize};

/// Build a clamped [`Page`] from the optional `page`/`per_page` query params.
pub(crate) fn page_from_params(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
) -> Page {
    Page::new(
        page.into_inner().unwrap_or(1),
        per_page.into_inner().unwrap_or(DEFAULT_PER_PAGE),
    )
}

/// Page position echoed back on every list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PageMeta {
    /// 1-based page number
    pub page: u32,

    /// Items per page
    pub per_page: u32,

    /// Total items across all pages
    pub total: u64,
}

impl<T> From<&Paginated<T>> for PageMeta {
    fn from(page: &Paginated<T>) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
        }
    }
}
