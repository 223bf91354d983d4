//! Repository for the `symbols` catalog.

use pidmark_core::types::DbId;
use sqlx::PgPool;

use crate::models::symbol::{CreateSymbol, Symbol};

/// Column list for symbols queries.
const COLUMNS: &str = "id, name, category, image_path, description, created_at";

/// Provides catalog operations for symbols.
pub struct SymbolRepo;

impl SymbolRepo {
    /// Add a symbol. A repeated `(category, name)` fails on
    /// `uq_symbols_category_name`.
    pub async fn create(pool: &PgPool, input: &CreateSymbol) -> Result<Symbol, sqlx::Error> {
        let query = format!(
            "INSERT INTO symbols (name, category, image_path, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Symbol>(&query)
            .bind(input.name.trim())
            .bind(input.category.trim())
            .bind(&input.image_path)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Symbol>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM symbols WHERE id = $1");
        sqlx::query_as::<_, Symbol>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List symbols ordered by category then name, optionally for one category.
    pub async fn list(pool: &PgPool, category: Option<&str>) -> Result<Vec<Symbol>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM symbols
             WHERE ($1::TEXT IS NULL OR category = $1)
             ORDER BY category ASC, name ASC"
        );
        sqlx::query_as::<_, Symbol>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Every symbol by id, the order export class indices are assigned in.
    pub async fn list_by_id(pool: &PgPool) -> Result<Vec<Symbol>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM symbols ORDER BY id ASC");
        sqlx::query_as::<_, Symbol>(&query).fetch_all(pool).await
    }

    /// Distinct category names, sorted.
    pub async fn list_categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT category FROM symbols ORDER BY category ASC")
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Delete a symbol. Annotations referencing it keep their box and lose
    /// the symbol link. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM symbols WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
