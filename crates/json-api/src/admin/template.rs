//! Import Template Handler

use salvo::{http::header::CONTENT_TYPE, oapi::extract::PathParam, prelude::*};

use folio_app::domain::imports::models::ImportKind;

use crate::extensions::*;

/// Import Template Handler
///
/// Returns the canonical example document for an import kind.
#[endpoint(tags("admin"), summary = "Import Template", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    kind: PathParam<String>,
    res: &mut Response,
) -> Result<(), StatusError> {
    let kind: ImportKind = kind
        .into_inner()
        .parse()
        .map_err(|_| StatusError::not_found().brief("Unknown template kind"))?;

    res.add_header(CONTENT_TYPE, "text/csv; charset=utf-8", true)
        .or_500("failed to set content type")?;

    res.render(kind.template());

    Ok(())
}
