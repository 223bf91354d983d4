//! Handlers for the read-mostly symbol catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use pidmark_core::error::CoreError;
use pidmark_core::symbol::{normalize_category_filter, validate_symbol_field};
use pidmark_core::types::DbId;
use pidmark_db::models::symbol::CreateSymbol;
use pidmark_db::repositories::SymbolRepo;

use crate::error::{AppError, AppResult};
use crate::query::CategoryParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /symbols?category=
pub async fn list_symbols(
    State(state): State<AppState>,
    Query(params): Query<CategoryParams>,
) -> AppResult<impl IntoResponse> {
    let category = normalize_category_filter(params.category.as_deref());
    let symbols = SymbolRepo::list(&state.pool, category).await?;
    Ok(Json(DataResponse { data: symbols }))
}

/// GET /symbols/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = SymbolRepo::list_categories(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /symbols/{id}
pub async fn get_symbol(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let symbol = SymbolRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Symbol", id }))?;
    Ok(Json(DataResponse { data: symbol }))
}

/// POST /symbols
pub async fn create_symbol(
    State(state): State<AppState>,
    Json(input): Json<CreateSymbol>,
) -> AppResult<impl IntoResponse> {
    validate_symbol_field("name", &input.name)?;
    validate_symbol_field("category", &input.category)?;

    let symbol = SymbolRepo::create(&state.pool, &input).await?;

    tracing::info!(
        symbol_id = symbol.id,
        name = %symbol.name,
        category = %symbol.category,
        "Symbol created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: symbol })))
}

/// DELETE /symbols/{id}
///
/// Annotations that referenced the symbol keep their boxes, unlinked.
pub async fn delete_symbol(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SymbolRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Symbol", id }));
    }
    tracing::info!(symbol_id = id, "Symbol deleted");
    Ok(StatusCode::NO_CONTENT)
}
