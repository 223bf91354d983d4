//! Repository for the `annotations` table.

use pidmark_core::types::DbId;
use sqlx::PgPool;

use crate::models::annotation::{Annotation, CreateAnnotation, UpdateAnnotation};

/// Column list for annotations queries.
const COLUMNS: &str = "id, page_id, symbol_id, x, y, width, height, tag_id, attributes, \
    source, confidence, created_at, updated_at";

/// Provides CRUD operations for annotations.
pub struct AnnotationRepo;

impl AnnotationRepo {
    /// Create an annotation on a page, returning the created row.
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        input: &CreateAnnotation,
    ) -> Result<Annotation, sqlx::Error> {
        let query = format!(
            "INSERT INTO annotations
                (page_id, symbol_id, x, y, width, height, tag_id, attributes, source, confidence)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     COALESCE($8, '{{}}'::jsonb), COALESCE($9, 'manual'), $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(page_id)
            .bind(input.symbol_id)
            .bind(input.x)
            .bind(input.y)
            .bind(input.width)
            .bind(input.height)
            .bind(input.tag_id.as_deref().map(str::trim))
            .bind(&input.attributes)
            .bind(&input.source)
            .bind(input.confidence)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Annotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM annotations WHERE id = $1");
        sqlx::query_as::<_, Annotation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a page's annotations in creation order, which is render order.
    pub async fn list_by_page(pool: &PgPool, page_id: DbId) -> Result<Vec<Annotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM annotations
             WHERE page_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// All annotations of a document, grouped by page.
    pub async fn list_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<Annotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM annotations
             WHERE page_id IN (SELECT id FROM pages WHERE document_id = $1)
             ORDER BY page_id ASC, id ASC"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if the annotation is gone.
    ///
    /// `symbol_id` and `tag_id` are cleared when the patch carries an
    /// explicit `null`, and kept when the field is absent.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAnnotation,
    ) -> Result<Option<Annotation>, sqlx::Error> {
        let symbol_provided = input.symbol_id.is_some();
        let symbol_value = input.symbol_id.flatten();
        let tag_provided = input.tag_id.is_some();
        let tag_value = input
            .tag_id
            .as_ref()
            .and_then(|t| t.as_deref())
            .map(str::trim);

        let query = format!(
            "UPDATE annotations SET
                symbol_id = CASE WHEN $1 THEN $2 ELSE symbol_id END,
                x = COALESCE($3, x),
                y = COALESCE($4, y),
                width = COALESCE($5, width),
                height = COALESCE($6, height),
                tag_id = CASE WHEN $7 THEN $8 ELSE tag_id END,
                attributes = COALESCE($9, attributes),
                updated_at = NOW()
             WHERE id = $10
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(symbol_provided)
            .bind(symbol_value)
            .bind(input.x)
            .bind(input.y)
            .bind(input.width)
            .bind(input.height)
            .bind(tag_provided)
            .bind(tag_value)
            .bind(&input.attributes)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an annotation and every connection touching it.
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
