//! Symbol catalog model and DTOs.

use pidmark_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `symbols` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Symbol {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub image_path: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for adding a symbol to the catalog.
#[derive(Debug, Deserialize)]
pub struct CreateSymbol {
    pub name: String,
    pub category: String,
    pub image_path: Option<String>,
    pub description: Option<String>,
}
