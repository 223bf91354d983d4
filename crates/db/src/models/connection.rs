//! Connection model and DTOs.

use pidmark_core::connection::{waypoints_from_json, LineType, PageConnection};
use pidmark_core::error::CoreError;
use pidmark_core::geometry::Point;
use pidmark_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `connections` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Connection {
    pub id: DbId,
    pub page_id: DbId,
    pub from_annotation_id: DbId,
    pub to_annotation_id: DbId,
    pub line_type: String,
    /// JSON array of `{x, y}` page-pixel points.
    pub waypoints: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Connection {
    pub fn line_type(&self) -> Result<LineType, CoreError> {
        LineType::from_str(&self.line_type)
    }

    pub fn waypoints(&self) -> Result<Vec<Point>, CoreError> {
        waypoints_from_json(&self.waypoints)
    }

    pub fn to_page_connection(&self) -> Result<PageConnection, CoreError> {
        Ok(PageConnection {
            id: self.id,
            from_annotation_id: self.from_annotation_id,
            to_annotation_id: self.to_annotation_id,
            line_type: self.line_type()?,
            waypoints: self.waypoints()?,
        })
    }
}

/// DTO for creating a connection on a page. `line_type` defaults to `process`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConnection {
    pub from_annotation_id: DbId,
    pub to_annotation_id: DbId,
    pub line_type: Option<String>,
    #[serde(default)]
    pub waypoints: Vec<Point>,
}

/// DTO for updating a connection's classification or route.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConnection {
    pub line_type: Option<String>,
    pub waypoints: Option<Vec<Point>>,
}
