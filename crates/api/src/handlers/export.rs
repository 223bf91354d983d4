//! Handlers for document exports: XML, YOLO labels, JSON digital twin.
//!
//! Each export loads the whole document into an [`ExportDocument`] snapshot
//! and hands it to the matching formatter in `pidmark_core::export`.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use pidmark_core::document::page_image_url;
use pidmark_core::export::twin::build_digital_twin;
use pidmark_core::export::xml::{render_xml, xml_filename};
use pidmark_core::export::yolo::build_yolo_export;
use pidmark_core::export::{
    ExportAnnotation, ExportConnection, ExportDocument, ExportPage, ExportSymbol,
};
use pidmark_core::types::DbId;
use pidmark_db::models::symbol::Symbol;
use pidmark_db::repositories::{AnnotationRepo, ConnectionRepo, PageRepo, SymbolRepo};

use crate::error::AppResult;
use crate::handlers::documents::ensure_document;
use crate::response::DataResponse;
use crate::state::AppState;

fn export_symbol(symbol: &Symbol) -> ExportSymbol {
    ExportSymbol {
        id: symbol.id,
        name: symbol.name.clone(),
        category: symbol.category.clone(),
    }
}

/// Load a document with every page, annotation and connection.
///
/// Returns the snapshot together with the full symbol catalog.
async fn load_snapshot(
    state: &AppState,
    document_id: DbId,
) -> AppResult<(ExportDocument, Vec<ExportSymbol>)> {
    let document = ensure_document(&state.pool, document_id).await?;
    let pages = PageRepo::list_by_document(&state.pool, document_id).await?;
    let annotations = AnnotationRepo::list_by_document(&state.pool, document_id).await?;
    let connections = ConnectionRepo::list_by_document(&state.pool, document_id).await?;
    let catalog: Vec<ExportSymbol> = SymbolRepo::list_by_id(&state.pool)
        .await?
        .iter()
        .map(export_symbol)
        .collect();
    let symbols: HashMap<DbId, &ExportSymbol> = catalog.iter().map(|s| (s.id, s)).collect();

    let mut annotations_by_page: HashMap<DbId, Vec<ExportAnnotation>> = HashMap::new();
    for ann in annotations {
        let entry = ExportAnnotation {
            id: ann.id,
            bbox: ann.bbox(),
            source: ann.source()?,
            symbol: ann
                .symbol_id
                .and_then(|id| symbols.get(&id))
                .map(|s| (*s).clone()),
            tag_id: ann.tag_id,
            attributes: ann.attributes,
        };
        annotations_by_page.entry(ann.page_id).or_default().push(entry);
    }

    let mut connections_by_page: HashMap<DbId, Vec<ExportConnection>> = HashMap::new();
    for conn in connections {
        let entry = ExportConnection {
            id: conn.id,
            from_annotation_id: conn.from_annotation_id,
            to_annotation_id: conn.to_annotation_id,
            line_type: conn.line_type()?,
            waypoints: conn.waypoints()?,
        };
        connections_by_page.entry(conn.page_id).or_default().push(entry);
    }

    let pages = pages
        .into_iter()
        .map(|page| ExportPage {
            id: page.id,
            page_number: page.page_number,
            width: page.width,
            height: page.height,
            image_url: Some(page_image_url(
                &state.config.public_base_url,
                document.id,
                page.page_number,
            )),
            annotations: annotations_by_page.remove(&page.id).unwrap_or_default(),
            connections: connections_by_page.remove(&page.id).unwrap_or_default(),
        })
        .collect();

    let snapshot = ExportDocument {
        id: document.id,
        filename: document.filename,
        page_count: document.page_count,
        status: document.status,
        uploaded_at: document.uploaded_at,
        pages,
    };
    Ok((snapshot, catalog))
}

/// GET /documents/{id}/export/xml
///
/// Download the `PIDDocument` XML as `{stem}_annotations.xml`.
pub async fn export_xml(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (snapshot, _) = load_snapshot(&state, id).await?;
    let xml = render_xml(&snapshot, chrono::Utc::now())?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        xml_filename(&snapshot.filename)
    );

    tracing::info!(document_id = id, bytes = xml.len(), "XML export generated");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/xml".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        xml,
    ))
}

/// GET /documents/{id}/export/yolo
pub async fn export_yolo(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (snapshot, catalog) = load_snapshot(&state, id).await?;
    let export = build_yolo_export(&snapshot, &catalog);
    tracing::info!(
        document_id = id,
        classes = export.class_names.len(),
        "YOLO export generated"
    );
    Ok(Json(DataResponse { data: export }))
}

/// GET /documents/{id}/export/json
pub async fn export_json(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (snapshot, _) = load_snapshot(&state, id).await?;
    let twin = build_digital_twin(&snapshot, chrono::Utc::now());
    tracing::info!(
        document_id = id,
        annotations = twin.annotation_count,
        "Digital twin export generated"
    );
    Ok(Json(DataResponse { data: twin }).into_response())
}
