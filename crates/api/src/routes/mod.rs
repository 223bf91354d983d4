pub mod annotations;
pub mod connections;
pub mod documents;
pub mod export;
pub mod health;
pub mod pages;
pub mod symbols;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /documents                                   list, register upload
/// /documents/{id}                              get, delete
/// /documents/{id}/status                       move processing status (PUT)
/// /documents/{id}/pages                        list, register page
/// /documents/{id}/pages/{page_number}          get page
/// /documents/{id}/export/xml                   PIDDocument XML download
/// /documents/{id}/export/yolo                  YOLO labels
/// /documents/{id}/export/json                  digital-twin snapshot
///
/// /symbols                                     list (?category), create
/// /symbols/categories                          distinct categories
/// /symbols/{id}                                get, delete
///
/// /pages/{page_id}/annotations                 list, create
/// /pages/{page_id}/connections                 list, create
///
/// /annotations/{id}                            get, update, delete
/// /connections/{id}                            get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Documents, their pages and exports.
        .nest(
            "/documents",
            documents::router().merge(export::document_export_router()),
        )
        // Symbol legend catalog.
        .nest("/symbols", symbols::router())
        // Page-scoped annotation and connection collections.
        .nest("/pages", pages::router())
        // Individual annotations and connections.
        .nest("/annotations", annotations::router())
        .nest("/connections", connections::router())
}
