//! Page-scoped collections. The page is the partition key for annotations
//! and connections.

use axum::routing::get;
use axum::Router;

use crate::handlers::{annotations, connections};
use crate::state::AppState;

/// Page routes, nested under `/pages`.
///
/// ```text
/// GET    /{page_id}/annotations         list_page_annotations
/// POST   /{page_id}/annotations         create_annotation
/// GET    /{page_id}/connections         list_page_connections
/// POST   /{page_id}/connections         create_connection
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{page_id}/annotations",
            get(annotations::list_page_annotations).post(annotations::create_annotation),
        )
        .route(
            "/{page_id}/connections",
            get(connections::list_page_connections).post(connections::create_connection),
        )
}
