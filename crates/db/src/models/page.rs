//! Page model and DTOs.

use pidmark_core::document::page_size;
use pidmark_core::geometry::Size;
use pidmark_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `pages` table. Pages never change once registered.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Page {
    pub id: DbId,
    pub document_id: DbId,
    pub page_number: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub image_path: Option<String>,
    pub created_at: Timestamp,
}

impl Page {
    /// Pixel size, when the rasterizer reported both dimensions.
    pub fn size(&self) -> Option<Size> {
        page_size(self.width, self.height)
    }
}

/// DTO for registering one rasterized page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub page_number: i32,
    pub width: i32,
    pub height: i32,
    pub image_path: Option<String>,
}

/// A page as returned by the API, with its image URL resolved.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    #[serde(flatten)]
    pub page: Page,
    pub image_url: String,
}
