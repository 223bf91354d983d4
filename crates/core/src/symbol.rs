//! Symbol catalog validation.

use crate::error::CoreError;

/// Maximum length of a symbol name or category.
pub const MAX_SYMBOL_FIELD_LENGTH: usize = 100;

/// Validate a symbol name or category label.
pub fn validate_symbol_field(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("symbol {field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_SYMBOL_FIELD_LENGTH {
        return Err(CoreError::Validation(format!(
            "symbol {field} must be at most {MAX_SYMBOL_FIELD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Normalize an optional `?category=` filter; blank means "no filter".
pub fn normalize_category_filter(category: Option<&str>) -> Option<&str> {
    category.map(str::trim).filter(|c| !c.is_empty())
}
