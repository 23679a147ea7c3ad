//! Database operations for `import_runs` — one bookkeeping row per batch call.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `import_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImportRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub source: String,
    pub supplier_id: String,
    pub cursor_in: Option<String>,
    pub status: String,
    pub processed: i32,
    pub duration_ms: i64,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of one batch invocation, ready to be recorded.
#[derive(Debug, Clone)]
pub struct NewImportRun<'a> {
    pub source: &'a str,
    pub supplier_id: &'a str,
    pub cursor_in: Option<&'a str>,
    /// `"succeeded"` or `"failed"`.
    pub status: &'a str,
    pub processed: i32,
    pub duration_ms: i64,
    pub error_message: Option<&'a str>,
}

/// Records the outcome of one batch invocation.
///
/// Generates the public UUID in Rust. Returns the new row's internal id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn record_import_run(pool: &PgPool, run: &NewImportRun<'_>) -> Result<i64, DbError> {
    let public_id = Uuid::new_v4();

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO import_runs \
             (public_id, source, supplier_id, cursor_in, status, processed, \
              duration_ms, error_message) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(public_id)
    .bind(run.source)
    .bind(run.supplier_id)
    .bind(run.cursor_in)
    .bind(run.status)
    .bind(run.processed)
    .bind(run.duration_ms)
    .bind(run.error_message)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Returns the most recent `limit` runs, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_import_runs(pool: &PgPool, limit: i64) -> Result<Vec<ImportRunRow>, DbError> {
    let rows = sqlx::query_as::<_, ImportRunRow>(
        "SELECT id, public_id, source, supplier_id, cursor_in, status, processed, \
                duration_ms, error_message, created_at \
         FROM import_runs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
