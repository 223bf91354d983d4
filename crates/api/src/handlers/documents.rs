//! Handlers for documents and their rasterized pages.
//!
//! Documents are registered by filename (file storage lives elsewhere) and
//! then driven through their processing states by the rasterizer, which also
//! registers each page image it produces.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use pidmark_core::document::{
    page_image_url, validate_page_dimensions, validate_page_number, validate_status_transition,
    validate_upload_filename, DocumentStatus,
};
use pidmark_core::error::CoreError;
use pidmark_core::types::DbId;
use pidmark_db::models::document::{CreateDocument, Document, UpdateDocumentStatus};
use pidmark_db::models::page::{CreatePage, Page, PageResponse};
use pidmark_db::repositories::{DocumentRepo, PageRepo};
use pidmark_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Helpers
   -------------------------------------------------------------------------- */

/// Load a document or fail with 404.
pub async fn ensure_document(pool: &DbPool, id: DbId) -> AppResult<Document> {
    DocumentRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        })
    })
}

fn page_response(state: &AppState, page: Page) -> PageResponse {
    let image_url = page_image_url(
        &state.config.public_base_url,
        page.document_id,
        page.page_number,
    );
    PageResponse { page, image_url }
}

/* --------------------------------------------------------------------------
   Documents
   -------------------------------------------------------------------------- */

/// GET /documents
///
/// List all documents, newest upload first.
pub async fn list_documents(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let documents = DocumentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// POST /documents
///
/// Register an uploaded file by name. The document starts as `uploaded`.
pub async fn create_document(
    State(state): State<AppState>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    validate_upload_filename(&input.filename)?;

    let document = DocumentRepo::create(&state.pool, input.filename.trim()).await?;

    tracing::info!(
        document_id = document.id,
        filename = %document.filename,
        "Document registered"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let document = ensure_document(&state.pool, id).await?;
    Ok(Json(DataResponse { data: document }))
}

/// DELETE /documents/{id}
///
/// Removes the document with all pages, annotations and connections.
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = DocumentRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }));
    }

    tracing::info!(document_id = id, "Document deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /documents/{id}/status
///
/// Move a document along its processing lifecycle. Illegal moves are 409.
pub async fn update_document_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDocumentStatus>,
) -> AppResult<impl IntoResponse> {
    let next = DocumentStatus::from_str(&input.status)?;
    let document = ensure_document(&state.pool, id).await?;
    let current = document.status()?;
    validate_status_transition(current, next)?;

    let document = DocumentRepo::update_status(&state.pool, id, current.as_str(), next.as_str())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "document {id} left '{}' before it could move to '{}'",
                current.as_str(),
                next.as_str()
            )))
        })?;

    tracing::info!(
        document_id = id,
        from = current.as_str(),
        to = next.as_str(),
        "Document status changed"
    );

    Ok(Json(DataResponse { data: document }))
}

/* --------------------------------------------------------------------------
   Pages
   -------------------------------------------------------------------------- */

/// GET /documents/{id}/pages
///
/// List pages by page number, each with its image URL.
pub async fn list_pages(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_document(&state.pool, id).await?;
    let pages: Vec<PageResponse> = PageRepo::list_by_document(&state.pool, id)
        .await?
        .into_iter()
        .map(|p| page_response(&state, p))
        .collect();
    Ok(Json(DataResponse { data: pages }))
}

/// POST /documents/{id}/pages
///
/// Register one rasterized page. Page numbers are unique per document.
pub async fn register_page(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    validate_page_number(input.page_number)?;
    validate_page_dimensions(input.width, input.height)?;
    ensure_document(&state.pool, id).await?;

    let page = PageRepo::create(&state.pool, id, &input).await?;

    tracing::info!(
        document_id = id,
        page_id = page.id,
        page_number = page.page_number,
        "Page registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: page_response(&state, page),
        }),
    ))
}

/// GET /documents/{id}/pages/{page_number}
pub async fn get_page(
    State(state): State<AppState>,
    Path((id, page_number)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    validate_page_number(page_number)?;
    ensure_document(&state.pool, id).await?;
    let page = PageRepo::find_by_number(&state.pool, id, page_number)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Document {id} has no page number {page_number}"))
        })?;
    Ok(Json(DataResponse {
        data: page_response(&state, page),
    }))
}
