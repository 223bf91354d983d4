//! Annotation model and DTOs.

use pidmark_core::annotation::{AnnotationSource, PageAnnotation};
use pidmark_core::error::CoreError;
use pidmark_core::geometry::BoundingBox;
use pidmark_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `annotations` table. The box is in page pixels.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Annotation {
    pub id: DbId,
    pub page_id: DbId,
    pub symbol_id: Option<DbId>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub tag_id: Option<String>,
    pub attributes: serde_json::Value,
    pub source: String,
    pub confidence: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Annotation {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn source(&self) -> Result<AnnotationSource, CoreError> {
        AnnotationSource::from_parts(&self.source, self.confidence)
    }

    /// The slice the annotation surface works with.
    pub fn to_page_annotation(&self) -> Result<PageAnnotation, CoreError> {
        Ok(PageAnnotation {
            id: self.id,
            bbox: self.bbox(),
            source: self.source()?,
            symbol_id: self.symbol_id,
            tag_id: self.tag_id.clone(),
        })
    }
}

/// DTO for creating an annotation on a page.
///
/// `source` defaults to `manual`; AI sources must send a `confidence`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnnotation {
    pub symbol_id: Option<DbId>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub tag_id: Option<String>,
    pub attributes: Option<serde_json::Value>,
    pub source: Option<String>,
    pub confidence: Option<f64>,
}

impl CreateAnnotation {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn source(&self) -> Result<AnnotationSource, CoreError> {
        AnnotationSource::from_parts(
            self.source.as_deref().unwrap_or(pidmark_core::annotation::SOURCE_MANUAL),
            self.confidence,
        )
    }
}

/// DTO for a partial annotation update. Absent fields are kept; an explicit
/// `null` for `symbol_id` or `tag_id` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAnnotation {
    #[serde(default, deserialize_with = "super::double_option")]
    pub symbol_id: Option<Option<DbId>>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub tag_id: Option<Option<String>>,
    pub attributes: Option<serde_json::Value>,
}

impl UpdateAnnotation {
    /// The box that results from applying this patch to `current`.
    pub fn merged_bbox(&self, current: BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.x.unwrap_or(current.x),
            self.y.unwrap_or(current.y),
            self.width.unwrap_or(current.width),
            self.height.unwrap_or(current.height),
        )
    }

    pub fn touches_bbox(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }
}
