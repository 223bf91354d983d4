//! Route definitions for documents and their pages.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Document routes, nested under `/documents`.
///
/// ```text
/// GET    /                              list_documents
/// POST   /                              create_document
/// GET    /{id}                          get_document
/// DELETE /{id}                          delete_document
/// PUT    /{id}/status                   update_document_status
/// GET    /{id}/pages                    list_pages
/// POST   /{id}/pages                    register_page
/// GET    /{id}/pages/{page_number}      get_page
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/{id}",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route("/{id}/status", put(documents::update_document_status))
        .route(
            "/{id}/pages",
            get(documents::list_pages).post(documents::register_page),
        )
        .route("/{id}/pages/{page_number}", get(documents::get_page))
}
