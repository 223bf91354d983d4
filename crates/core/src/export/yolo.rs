//! YOLO training label export.
//!
//! Class ids are positions in the symbol catalog ordered by symbol id, so
//! the same catalog always yields the same `classes.txt`.

use std::collections::HashMap;

use serde::Serialize;

use crate::document::page_size;
use crate::types::DbId;

use super::{round_to, ExportDocument, ExportSymbol};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoloLabel {
    pub class_id: usize,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloLabel {
    /// One line of a label file.
    pub fn to_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YoloPage {
    pub page_number: i32,
    pub image_url: Option<String>,
    pub annotations: Vec<YoloLabel>,
    pub label_lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YoloExport {
    pub document_id: DbId,
    pub class_names: Vec<String>,
    pub pages: Vec<YoloPage>,
}

/// Build labels for every page. `catalog` may come in any order.
pub fn build_yolo_export(doc: &ExportDocument, catalog: &[ExportSymbol]) -> YoloExport {
    let mut symbols: Vec<&ExportSymbol> = catalog.iter().collect();
    symbols.sort_by_key(|s| s.id);
    let class_map: HashMap<DbId, usize> = symbols
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.id, idx))
        .collect();

    let pages = doc
        .pages_in_order()
        .into_iter()
        .map(|page| {
            let annotations: Vec<YoloLabel> = match page_size(page.width, page.height) {
                Some(size) => page
                    .annotations
                    .iter()
                    .filter_map(|ann| {
                        let class_id = *class_map.get(&ann.symbol.as_ref()?.id)?;
                        let center = ann.bbox.center();
                        Some(YoloLabel {
                            class_id,
                            x_center: round_to(center.x / size.width, 6),
                            y_center: round_to(center.y / size.height, 6),
                            width: round_to(ann.bbox.width / size.width, 6),
                            height: round_to(ann.bbox.height / size.height, 6),
                        })
                    })
                    .collect(),
                None => Vec::new(),
            };
            let label_lines = annotations.iter().map(YoloLabel::to_line).collect();
            YoloPage {
                page_number: page.page_number,
                image_url: page.image_url.clone(),
                annotations,
                label_lines,
            }
        })
        .collect();

    YoloExport {
        document_id: doc.id,
        class_names: symbols.iter().map(|s| s.name.clone()).collect(),
        pages,
    }
}
