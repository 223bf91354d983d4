//! Repository for the `pages` table.

use pidmark_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::{CreatePage, Page};

/// Column list for pages queries.
const COLUMNS: &str = "id, document_id, page_number, width, height, image_path, created_at";

/// Provides registration and lookup for rasterized pages.
pub struct PageRepo;

impl PageRepo {
    /// Register one page and refresh the owning document's `page_count`.
    ///
    /// A duplicate page number fails on `uq_pages_document_page`.
    pub async fn create(
        pool: &PgPool,
        document_id: DbId,
        input: &CreatePage,
    ) -> Result<Page, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO pages (document_id, page_number, width, height, image_path)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let page = sqlx::query_as::<_, Page>(&query)
            .bind(document_id)
            .bind(input.page_number)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.image_path)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE documents SET
                page_count = (SELECT COUNT(*) FROM pages WHERE document_id = $1),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(document_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(page)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_number(
        pool: &PgPool,
        document_id: DbId,
        page_number: i32,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages
             WHERE document_id = $1 AND page_number = $2"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(document_id)
            .bind(page_number)
            .fetch_optional(pool)
            .await
    }

    /// List a document's pages by page number.
    pub async fn list_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages
             WHERE document_id = $1
             ORDER BY page_number ASC"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }
}
