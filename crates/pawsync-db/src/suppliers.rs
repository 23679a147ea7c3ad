//! Database operations for `suppliers`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `suppliers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SupplierRow {
    pub supplier_id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Synthesizes the placeholder contact address used when a supplier record
/// is auto-created from a catalog row.
///
/// The id is lowercased and non-alphanumeric runs collapse to `-` so the
/// local part stays a valid mailbox token. The `.invalid` TLD guarantees the
/// address can never deliver.
#[must_use]
pub fn placeholder_email(supplier_id: &str) -> String {
    let mut local = String::with_capacity(supplier_id.len());
    let mut last_dash = true;
    for c in supplier_id.chars() {
        if c.is_ascii_alphanumeric() {
            local.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            local.push('-');
            last_dash = true;
        }
    }
    let local = local.trim_end_matches('-');
    let local = if local.is_empty() { "supplier" } else { local };
    format!("{local}@suppliers.pawsync.invalid")
}

/// Ensures a supplier row exists, auto-creating a placeholder record on
/// first reference.
///
/// The insert is insert-if-absent: an existing supplier is left untouched
/// (auto-creation never clobbers real supplier metadata entered elsewhere).
/// Returns `true` if a new row was created.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn ensure_supplier(pool: &PgPool, supplier_id: &str) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "INSERT INTO suppliers (supplier_id, name, email) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (supplier_id) DO NOTHING",
    )
    .bind(supplier_id)
    .bind(supplier_id)
    .bind(placeholder_email(supplier_id))
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Fetches a supplier by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn get_supplier(pool: &PgPool, supplier_id: &str) -> Result<SupplierRow, DbError> {
    let row = sqlx::query_as::<_, SupplierRow>(
        "SELECT supplier_id, name, email, created_at \
         FROM suppliers \
         WHERE supplier_id = $1",
    )
    .bind(supplier_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}
