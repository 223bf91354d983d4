//! Handlers for connections between annotations on one page.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use pidmark_core::connection::{
    validate_endpoints, validate_same_page, validate_waypoints, LineType,
};
use pidmark_core::error::CoreError;
use pidmark_core::types::DbId;
use pidmark_db::models::connection::{Connection, CreateConnection, UpdateConnection};
use pidmark_db::repositories::ConnectionRepo;
use pidmark_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::annotations::{ensure_annotation, ensure_page};
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_connection(pool: &DbPool, id: DbId) -> AppResult<Connection> {
    ConnectionRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Connection",
            id,
        })
    })
}

/// GET /pages/{page_id}/connections
pub async fn list_page_connections(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_page(&state.pool, page_id).await?;
    let connections = ConnectionRepo::list_by_page(&state.pool, page_id).await?;
    Ok(Json(DataResponse { data: connections }))
}

/// POST /pages/{page_id}/connections
///
/// Both endpoints must be distinct annotations on this page.
pub async fn create_connection(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<CreateConnection>,
) -> AppResult<impl IntoResponse> {
    ensure_page(&state.pool, page_id).await?;

    validate_endpoints(input.from_annotation_id, input.to_annotation_id)?;
    if let Some(line_type) = &input.line_type {
        LineType::from_str(line_type)?;
    }
    validate_waypoints(&input.waypoints)?;

    let from = ensure_annotation(&state.pool, input.from_annotation_id).await?;
    let to = ensure_annotation(&state.pool, input.to_annotation_id).await?;
    validate_same_page(page_id, from.page_id, to.page_id)?;

    // The insert re-checks page membership in case an endpoint moved or
    // vanished since the lookups.
    let connection = ConnectionRepo::create(&state.pool, page_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "connection endpoints must be on page {page_id}"
            )))
        })?;

    tracing::info!(
        page_id,
        connection_id = connection.id,
        from_annotation_id = connection.from_annotation_id,
        to_annotation_id = connection.to_annotation_id,
        "Connection created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: connection })))
}

/// GET /connections/{id}
pub async fn get_connection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let connection = ensure_connection(&state.pool, id).await?;
    Ok(Json(DataResponse { data: connection }))
}

/// PUT /connections/{id}
///
/// Update the line type and/or waypoints. Endpoints are fixed.
pub async fn update_connection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateConnection>,
) -> AppResult<impl IntoResponse> {
    if let Some(line_type) = &input.line_type {
        LineType::from_str(line_type)?;
    }
    if let Some(waypoints) = &input.waypoints {
        validate_waypoints(waypoints)?;
    }

    let connection = ConnectionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Connection",
                id,
            })
        })?;

    tracing::info!(
        page_id = connection.page_id,
        connection_id = id,
        "Connection updated"
    );

    Ok(Json(DataResponse { data: connection }))
}

/// DELETE /connections/{id}
pub async fn delete_connection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ConnectionRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Connection",
            id,
        }));
    }

    tracing::info!(connection_id = id, "Connection deleted");

    Ok(StatusCode::NO_CONTENT)
}
