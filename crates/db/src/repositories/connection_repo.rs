//! Repository for the `connections` table.

use pidmark_core::connection::waypoints_to_json;
use pidmark_core::types::DbId;
use sqlx::PgPool;

use crate::models::connection::{Connection, CreateConnection, UpdateConnection};

/// Column list for connections queries.
const COLUMNS: &str = "id, page_id, from_annotation_id, to_annotation_id, line_type, \
    waypoints, created_at, updated_at";

/// Provides CRUD operations for connections.
pub struct ConnectionRepo;

impl ConnectionRepo {
    /// Create a connection whose endpoints both sit on `page_id`.
    ///
    /// Returns `None` when either endpoint is missing or on another page;
    /// the check runs in the same statement as the insert.
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        input: &CreateConnection,
    ) -> Result<Option<Connection>, sqlx::Error> {
        let query = format!(
            "INSERT INTO connections
                (page_id, from_annotation_id, to_annotation_id, line_type, waypoints)
             SELECT $1, $2, $3, COALESCE($4, 'process'), $5
             WHERE EXISTS (SELECT 1 FROM annotations WHERE id = $2 AND page_id = $1)
               AND EXISTS (SELECT 1 FROM annotations WHERE id = $3 AND page_id = $1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(page_id)
            .bind(input.from_annotation_id)
            .bind(input.to_annotation_id)
            .bind(&input.line_type)
            .bind(waypoints_to_json(&input.waypoints))
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Connection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM connections WHERE id = $1");
        sqlx::query_as::<_, Connection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a page's connections in creation order.
    pub async fn list_by_page(pool: &PgPool, page_id: DbId) -> Result<Vec<Connection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM connections
             WHERE page_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// All connections of a document, grouped by page.
    pub async fn list_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<Connection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM connections
             WHERE page_id IN (SELECT id FROM pages WHERE document_id = $1)
             ORDER BY page_id ASC, id ASC"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Update line type and/or waypoints. Returns `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateConnection,
    ) -> Result<Option<Connection>, sqlx::Error> {
        let query = format!(
            "UPDATE connections SET
                line_type = COALESCE($1, line_type),
                waypoints = COALESCE($2, waypoints),
                updated_at = NOW()
             WHERE id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(&input.line_type)
            .bind(input.waypoints.as_deref().map(waypoints_to_json))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a connection. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM connections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
