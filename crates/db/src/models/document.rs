//! Document model and DTOs.

use pidmark_core::document::DocumentStatus;
use pidmark_core::error::CoreError;
use pidmark_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `documents` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Document {
    pub id: DbId,
    pub filename: String,
    pub page_count: i32,
    pub status: String,
    pub uploaded_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Document {
    pub fn status(&self) -> Result<DocumentStatus, CoreError> {
        DocumentStatus::from_str(&self.status)
    }
}

/// DTO for registering an uploaded file.
#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub filename: String,
}

/// DTO for moving a document to a new processing status.
#[derive(Debug, Deserialize)]
pub struct UpdateDocumentStatus {
    pub status: String,
}
