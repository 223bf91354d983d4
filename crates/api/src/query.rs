//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?category=` filter for symbol listings. Blank means no filter.
#[derive(Debug, Deserialize)]
pub struct CategoryParams {
    pub category: Option<String>,
}
