use axum::routing::get;
use axum::Router;

use crate::handlers::annotations;
use crate::state::AppState;

/// Annotation routes, nested under `/annotations`.
///
/// ```text
/// GET    /{id}                          get_annotation
/// PUT    /{id}                          update_annotation
/// DELETE /{id}                          delete_annotation
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(annotations::get_annotation)
            .put(annotations::update_annotation)
            .delete(annotations::delete_annotation),
    )
}
