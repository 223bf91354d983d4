//! Repository for the `documents` table.

use pidmark_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::Document;

/// Column list for documents queries.
const COLUMNS: &str = "id, filename, page_count, status, uploaded_at, updated_at";

/// Provides CRUD operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Register an upload. New documents start as `uploaded` with no pages.
    pub async fn create(pool: &PgPool, filename: &str) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (filename)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(filename)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all documents, newest upload first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             ORDER BY uploaded_at DESC, id DESC"
        );
        sqlx::query_as::<_, Document>(&query).fetch_all(pool).await
    }

    /// Move the document from `expected` to `status`.
    ///
    /// Returns `None` if the document is gone or no longer in `expected`, so
    /// two racing transitions cannot both apply. Transition rules are
    /// enforced by the caller.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected: &str,
        status: &str,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET status = $1, updated_at = NOW()
             WHERE id = $2 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(status)
            .bind(id)
            .bind(expected)
            .fetch_optional(pool)
            .await
    }

    /// Delete a document with its pages, annotations and connections.
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
