use axum::routing::get;
use axum::Router;

use crate::handlers::connections;
use crate::state::AppState;

/// Connection routes, nested under `/connections`.
///
/// ```text
/// GET    /{id}                          get_connection
/// PUT    /{id}                          update_connection
/// DELETE /{id}                          delete_connection
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(connections::get_connection)
            .put(connections::update_connection)
            .delete(connections::delete_connection),
    )
}
