//! Handlers for page annotations.
//!
//! Boxes are validated in page pixels before anything is persisted: origin
//! non-negative, extent positive, and inside the page when its dimensions are
//! known. Partial updates are checked against the merged box.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use pidmark_core::annotation::{validate_attributes, validate_tag_id};
use pidmark_core::error::CoreError;
use pidmark_core::geometry::BoundingBox;
use pidmark_core::types::DbId;
use pidmark_db::models::annotation::{Annotation, CreateAnnotation, UpdateAnnotation};
use pidmark_db::models::page::Page;
use pidmark_db::repositories::{AnnotationRepo, PageRepo, SymbolRepo};
use pidmark_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Helpers
   -------------------------------------------------------------------------- */

/// Load a page or fail with 404.
pub async fn ensure_page(pool: &DbPool, id: DbId) -> AppResult<Page> {
    PageRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Page", id }))
}

/// Load an annotation or fail with 404.
pub async fn ensure_annotation(pool: &DbPool, id: DbId) -> AppResult<Annotation> {
    AnnotationRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Annotation",
            id,
        })
    })
}

async fn ensure_symbol_exists(pool: &DbPool, id: DbId) -> AppResult<()> {
    SymbolRepo::find_by_id(pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Symbol", id }))
}

fn validate_box_on_page(bbox: &BoundingBox, page: &Page) -> Result<(), CoreError> {
    match page.size() {
        Some(size) => bbox.validate_within(size),
        None => bbox.validate(),
    }
}

/* --------------------------------------------------------------------------
   Handlers
   -------------------------------------------------------------------------- */

/// GET /pages/{page_id}/annotations
///
/// List a page's annotations in render order (creation order).
pub async fn list_page_annotations(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_page(&state.pool, page_id).await?;
    let annotations = AnnotationRepo::list_by_page(&state.pool, page_id).await?;
    Ok(Json(DataResponse { data: annotations }))
}

/// POST /pages/{page_id}/annotations
pub async fn create_annotation(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<CreateAnnotation>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, page_id).await?;

    validate_box_on_page(&input.bbox(), &page)?;
    let source = input.source()?;
    if let Some(tag) = &input.tag_id {
        validate_tag_id(tag)?;
    }
    if let Some(attributes) = &input.attributes {
        validate_attributes(attributes)?;
    }
    if let Some(symbol_id) = input.symbol_id {
        ensure_symbol_exists(&state.pool, symbol_id).await?;
    }

    let annotation = AnnotationRepo::create(&state.pool, page_id, &input).await?;

    tracing::info!(
        page_id,
        annotation_id = annotation.id,
        source = source.to_parts().0,
        "Annotation created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: annotation })))
}

/// GET /annotations/{id}
pub async fn get_annotation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let annotation = ensure_annotation(&state.pool, id).await?;
    Ok(Json(DataResponse { data: annotation }))
}

/// PUT /annotations/{id}
///
/// Partial update of symbol, box, tag and attributes. An explicit `null`
/// symbol or tag unassigns it.
pub async fn update_annotation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAnnotation>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_annotation(&state.pool, id).await?;

    if input.touches_bbox() {
        let page = ensure_page(&state.pool, existing.page_id).await?;
        validate_box_on_page(&input.merged_bbox(existing.bbox()), &page)?;
    }
    if let Some(Some(tag)) = &input.tag_id {
        validate_tag_id(tag)?;
    }
    if let Some(attributes) = &input.attributes {
        validate_attributes(attributes)?;
    }
    if let Some(Some(symbol_id)) = input.symbol_id {
        ensure_symbol_exists(&state.pool, symbol_id).await?;
    }

    let annotation = AnnotationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Annotation",
                id,
            })
        })?;

    tracing::info!(
        page_id = annotation.page_id,
        annotation_id = id,
        "Annotation updated"
    );

    Ok(Json(DataResponse { data: annotation }))
}

/// DELETE /annotations/{id}
///
/// Connections touching the annotation are removed with it.
pub async fn delete_annotation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = AnnotationRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Annotation",
            id,
        }));
    }

    tracing::info!(annotation_id = id, "Annotation deleted");

    Ok(StatusCode::NO_CONTENT)
}
