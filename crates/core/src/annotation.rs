//! Annotation source tagging and field validation.
//!
//! Provides the closed [`AnnotationSource`] variant, the page-local
//! [`PageAnnotation`] record the surface renders, and the validation helpers
//! used by the API layer before anything is persisted.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::BoundingBox;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a tag identifier such as `FIC-101`.
pub const MAX_TAG_ID_LENGTH: usize = 50;

/// Maximum number of attribute entries on a single annotation.
pub const MAX_ATTRIBUTES: usize = 100;

/// Maximum length of an attribute key.
pub const MAX_ATTRIBUTE_KEY_LENGTH: usize = 100;

/// Source tag stored for hand-drawn annotations.
pub const SOURCE_MANUAL: &str = "manual";

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Detector that produced an AI annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionModel {
    Yolo,
    Aws,
}

const VALID_DETECTOR_STRINGS: &[&str] = &["yolo", "aws"];

impl DetectionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yolo => "yolo",
            Self::Aws => "aws",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "yolo" => Ok(Self::Yolo),
            "aws" => Ok(Self::Aws),
            _ => Err(CoreError::Validation(format!(
                "Invalid annotation source '{s}'. Must be '{SOURCE_MANUAL}' or one of: {}",
                VALID_DETECTOR_STRINGS.join(", ")
            ))),
        }
    }
}

/// Where an annotation came from. Only AI detections carry a confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationSource {
    Manual,
    AiDetected {
        model: DetectionModel,
        confidence: f64,
    },
}

impl AnnotationSource {
    /// Rebuild a source from its stored `(source, confidence)` column pair.
    pub fn from_parts(source: &str, confidence: Option<f64>) -> Result<Self, CoreError> {
        if source == SOURCE_MANUAL {
            return match confidence {
                None => Ok(Self::Manual),
                Some(_) => Err(CoreError::Validation(
                    "manual annotations must not carry a confidence score".to_string(),
                )),
            };
        }

        let model = DetectionModel::from_str(source)?;
        let confidence = confidence.ok_or_else(|| {
            CoreError::Validation(format!(
                "annotations detected by '{source}' require a confidence score"
            ))
        })?;
        validate_confidence(confidence)?;
        Ok(Self::AiDetected { model, confidence })
    }

    /// Split into the `(source, confidence)` column pair.
    pub fn to_parts(&self) -> (&'static str, Option<f64>) {
        match self {
            Self::Manual => (SOURCE_MANUAL, None),
            Self::AiDetected { model, confidence } => (model.as_str(), Some(*confidence)),
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        self.to_parts().1
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

// ---------------------------------------------------------------------------
// Page-local record
// ---------------------------------------------------------------------------

/// The slice of an annotation the surface and session work with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageAnnotation {
    pub id: DbId,
    pub bbox: BoundingBox,
    pub source: AnnotationSource,
    pub symbol_id: Option<DbId>,
    pub tag_id: Option<String>,
}

impl PageAnnotation {
    pub fn manual(id: DbId, bbox: BoundingBox) -> Self {
        Self {
            id,
            bbox,
            source: AnnotationSource::Manual,
            symbol_id: None,
            tag_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Confidence must be a finite value in `[0, 1]`.
pub fn validate_confidence(confidence: f64) -> Result<(), CoreError> {
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(CoreError::Validation(format!(
            "confidence must be between 0 and 1, got {confidence}"
        )));
    }
    Ok(())
}

/// Tag ids are trimmed, non-empty and at most [`MAX_TAG_ID_LENGTH`] chars.
pub fn validate_tag_id(tag_id: &str) -> Result<(), CoreError> {
    let trimmed = tag_id.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("tag id must not be blank".to_string()));
    }
    if trimmed.chars().count() > MAX_TAG_ID_LENGTH {
        return Err(CoreError::Validation(format!(
            "tag id must be at most {MAX_TAG_ID_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Attributes must be a JSON object with non-empty keys.
///
/// Key uniqueness is inherent to a JSON object once parsed.
pub fn validate_attributes(attributes: &serde_json::Value) -> Result<(), CoreError> {
    let obj = attributes.as_object().ok_or_else(|| {
        CoreError::Validation("attributes must be a JSON object".to_string())
    })?;

    if obj.len() > MAX_ATTRIBUTES {
        return Err(CoreError::Validation(format!(
            "attributes has {} entries, maximum is {MAX_ATTRIBUTES}",
            obj.len()
        )));
    }

    for key in obj.keys() {
        if key.trim().is_empty() {
            return Err(CoreError::Validation(
                "attribute keys must not be blank".to_string(),
            ));
        }
        if key.chars().count() > MAX_ATTRIBUTE_KEY_LENGTH {
            return Err(CoreError::Validation(format!(
                "attribute key '{key}' exceeds {MAX_ATTRIBUTE_KEY_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Render an attribute value as plain text for exports.
pub fn attribute_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn manual_source_round_trip() {
        let source = AnnotationSource::from_parts("manual", None).unwrap();
        assert_eq!(source, AnnotationSource::Manual);
        assert_eq!(source.to_parts(), ("manual", None));
    }

    #[test]
    fn ai_source_round_trip() {
        let source = AnnotationSource::from_parts("yolo", Some(0.87)).unwrap();
        assert_matches!(
            source,
            AnnotationSource::AiDetected { model: DetectionModel::Yolo, confidence } if confidence == 0.87
        );
        assert_eq!(source.to_parts(), ("yolo", Some(0.87)));
    }

    #[test]
    fn manual_with_confidence_rejected() {
        let err = AnnotationSource::from_parts("manual", Some(0.5)).unwrap_err();
        assert!(err.to_string().contains("must not carry a confidence"));
    }

    #[test]
    fn ai_without_confidence_rejected() {
        assert!(AnnotationSource::from_parts("aws", None).is_err());
    }

    #[test]
    fn unknown_source_rejected() {
        let err = AnnotationSource::from_parts("ocr", Some(0.5)).unwrap_err();
        assert!(err.to_string().contains("Invalid annotation source"));
    }

    #[test]
    fn confidence_out_of_range_rejected() {
        assert!(AnnotationSource::from_parts("yolo", Some(1.2)).is_err());
        assert!(validate_confidence(-0.01).is_err());
        assert!(validate_confidence(f64::NAN).is_err());
        assert!(validate_confidence(0.0).is_ok());
        assert!(validate_confidence(1.0).is_ok());
    }

    #[test]
    fn source_serializes_as_tagged_variant() {
        let value = serde_json::to_value(AnnotationSource::AiDetected {
            model: DetectionModel::Aws,
            confidence: 0.5,
        })
        .unwrap();
        assert_eq!(value, json!({"kind": "ai_detected", "model": "aws", "confidence": 0.5}));
        let manual = serde_json::to_value(AnnotationSource::Manual).unwrap();
        assert_eq!(manual, json!({"kind": "manual"}));
    }

    #[test]
    fn tag_id_rules() {
        assert!(validate_tag_id("FIC-101").is_ok());
        assert!(validate_tag_id("   ").is_err());
        assert!(validate_tag_id(&"X".repeat(MAX_TAG_ID_LENGTH + 1)).is_err());
    }

    #[test]
    fn attributes_must_be_object() {
        assert!(validate_attributes(&json!({"size": "2in", "rating": 150})).is_ok());
        assert!(validate_attributes(&json!({})).is_ok());
        assert!(validate_attributes(&json!(["size"])).is_err());
        assert!(validate_attributes(&json!({"": "x"})).is_err());
    }

    #[test]
    fn attribute_text_flattens_scalars() {
        assert_eq!(attribute_text(&json!("2in")), "2in");
        assert_eq!(attribute_text(&json!(150)), "150");
        assert_eq!(attribute_text(&json!(null)), "");
    }
}
