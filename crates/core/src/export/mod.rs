//! Export formats built from a fully loaded document snapshot.
//!
//! The API layer assembles an [`ExportDocument`] from the repositories and
//! hands it to one of the formatters:
//!
//! - [`xml::render_xml`] for the `PIDDocument` interchange file;
//! - [`yolo::build_yolo_export`] for detector training labels;
//! - [`twin::build_digital_twin`] for the JSON snapshot.

pub mod twin;
pub mod xml;
pub mod yolo;

use serde::Serialize;

use crate::annotation::AnnotationSource;
use crate::connection::LineType;
use crate::geometry::{BoundingBox, Point};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Serialize)]
pub struct ExportSymbol {
    pub id: DbId,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportAnnotation {
    pub id: DbId,
    pub bbox: BoundingBox,
    pub source: AnnotationSource,
    pub symbol: Option<ExportSymbol>,
    pub tag_id: Option<String>,
    /// JSON object of attribute key to value.
    pub attributes: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportConnection {
    pub id: DbId,
    pub from_annotation_id: DbId,
    pub to_annotation_id: DbId,
    pub line_type: LineType,
    pub waypoints: Vec<Point>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportPage {
    pub id: DbId,
    pub page_number: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub image_url: Option<String>,
    /// In creation order.
    pub annotations: Vec<ExportAnnotation>,
    pub connections: Vec<ExportConnection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub id: DbId,
    pub filename: String,
    pub page_count: i32,
    pub status: String,
    pub uploaded_at: Timestamp,
    pub pages: Vec<ExportPage>,
}

impl ExportDocument {
    /// Pages ordered by page number, whatever order they were loaded in.
    pub fn pages_in_order(&self) -> Vec<&ExportPage> {
        let mut pages: Vec<&ExportPage> = self.pages.iter().collect();
        pages.sort_by_key(|p| p.page_number);
        pages
    }
}

/// Round to `places` decimals and print without trailing zeros.
pub(crate) fn format_decimal(value: f64, places: i32) -> String {
    round_to(value, places).to_string()
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_drop_trailing_zeros() {
        assert_eq!(format_decimal(133.3333, 2), "133.33");
        assert_eq!(format_decimal(100.0, 2), "100");
        assert_eq!(format_decimal(0.87654, 3), "0.877");
    }

    #[test]
    fn pages_sorted_by_number() {
        let doc = fixtures::document();
        let numbers: Vec<i32> = doc.pages_in_order().iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }
}
