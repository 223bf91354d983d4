//! Document lifecycle and page registration rules.
//!
//! Documents are created on upload and moved through their processing
//! states by the rasterization pipeline. Pages are registered once per
//! rendered image and never change afterwards.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::Size;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// File extensions accepted for upload (lowercase, with leading dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".png", ".jpg", ".jpeg", ".tiff", ".bmp"];

/// Maximum length of a stored filename.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Upper bound on registered page dimensions, in pixels.
pub const MAX_PAGE_DIMENSION: i32 = 100_000;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Uploaded,
    Processing,
    Ready,
    Error,
}

const VALID_STATUS_STRINGS: &[&str] = &["uploaded", "processing", "ready", "error"];

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "uploaded" => Ok(Self::Uploaded),
            "processing" => Ok(Self::Processing),
            "ready" => Ok(Self::Ready),
            "error" => Ok(Self::Error),
            _ => Err(CoreError::Validation(format!(
                "Invalid document status '{s}'. Must be one of: {}",
                VALID_STATUS_STRINGS.join(", ")
            ))),
        }
    }

    /// Whether the pipeline may move a document from `self` to `next`.
    ///
    /// `error` may go back to `processing` so a failed rasterization can be
    /// retried.
    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Uploaded, Self::Processing)
                | (Self::Processing, Self::Ready)
                | (Self::Processing, Self::Error)
                | (Self::Error, Self::Processing)
        )
    }
}

/// Validate a status transition, returning a conflict for illegal moves.
pub fn validate_status_transition(
    current: DocumentStatus,
    next: DocumentStatus,
) -> Result<(), CoreError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "cannot move document from '{}' to '{}'",
            current.as_str(),
            next.as_str()
        )))
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an uploaded filename and its extension (case-insensitive).
pub fn validate_upload_filename(filename: &str) -> Result<(), CoreError> {
    let trimmed = filename.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("filename must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_FILENAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "filename must be at most {MAX_FILENAME_LENGTH} characters"
        )));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(CoreError::Validation(
            "filename must not contain path separators".to_string(),
        ));
    }

    let ext = file_extension(trimmed).ok_or_else(|| {
        CoreError::Validation(format!(
            "File type not allowed. Allowed types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))
    })?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "File type '{ext}' not allowed. Allowed types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

/// Lowercased extension including the leading dot, if any.
fn file_extension(filename: &str) -> Option<String> {
    let idx = filename.rfind('.')?;
    if idx == 0 || idx == filename.len() - 1 {
        return None;
    }
    Some(filename[idx..].to_ascii_lowercase())
}

/// Filename without its final extension, used to name export downloads.
pub fn filename_stem(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    }
}

/// Page numbers are 1-indexed.
pub fn validate_page_number(page_number: i32) -> Result<(), CoreError> {
    if page_number < 1 {
        return Err(CoreError::Validation(format!(
            "page number must be at least 1, got {page_number}"
        )));
    }
    Ok(())
}

pub fn validate_page_dimensions(width: i32, height: i32) -> Result<(), CoreError> {
    let ok = |v: i32| (1..=MAX_PAGE_DIMENSION).contains(&v);
    if !ok(width) || !ok(height) {
        return Err(CoreError::Validation(format!(
            "page dimensions must be between 1 and {MAX_PAGE_DIMENSION} pixels, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Pixel size of a page, when both dimensions are known.
pub fn page_size(width: Option<i32>, height: Option<i32>) -> Option<Size> {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some(Size::new(f64::from(w), f64::from(h))),
        _ => None,
    }
}

/// Public URL of the rendered image for one page.
pub fn page_image_url(base_url: &str, document_id: DbId, page_number: i32) -> String {
    format!(
        "{}/api/v1/documents/{document_id}/pages/{page_number}/image",
        base_url.trim_end_matches('/')
    )
}
