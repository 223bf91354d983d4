//! JSON digital-twin snapshot.

use serde::Serialize;

use crate::types::Timestamp;

use super::ExportDocument;

pub const TWIN_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
pub struct DigitalTwin<'a> {
    pub format_version: &'static str,
    pub exported_at: Timestamp,
    pub document: &'a ExportDocument,
    pub annotation_count: usize,
    pub connection_count: usize,
}

pub fn build_digital_twin(doc: &ExportDocument, exported_at: Timestamp) -> DigitalTwin<'_> {
    DigitalTwin {
        format_version: TWIN_FORMAT_VERSION,
        exported_at,
        document: doc,
        annotation_count: doc.pages.iter().map(|p| p.annotations.len()).sum(),
        connection_count: doc.pages.iter().map(|p| p.connections.len()).sum(),
    }
}
