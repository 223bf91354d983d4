//! Route definitions for the symbol catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::symbols;
use crate::state::AppState;

/// Symbol routes, nested under `/symbols`.
///
/// ```text
/// GET    /                              list_symbols (?category)
/// POST   /                              create_symbol
/// GET    /categories                    list_categories
/// GET    /{id}                          get_symbol
/// DELETE /{id}                          delete_symbol
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(symbols::list_symbols).post(symbols::create_symbol))
        .route("/categories", get(symbols::list_categories))
        .route(
            "/{id}",
            get(symbols::get_symbol).delete(symbols::delete_symbol),
        )
}
