//! Route definitions for document exports.
//!
//! Merged into the `/documents` route group.

use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Document-scoped export routes, merged into `/documents`.
///
/// ```text
/// GET    /{id}/export/xml               export_xml
/// GET    /{id}/export/yolo              export_yolo
/// GET    /{id}/export/json              export_json
/// ```
pub fn document_export_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/export/xml", get(export::export_xml))
        .route("/{id}/export/yolo", get(export::export_yolo))
        .route("/{id}/export/json", get(export::export_json))
}
