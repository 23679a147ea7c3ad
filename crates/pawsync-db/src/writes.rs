//! Materializes planned [`WriteOp`]s into one all-or-nothing transaction.

use pawsync_core::WriteOp;
use sqlx::{PgPool, Postgres, Transaction};

use crate::DbError;

/// Applies a batch's write ops inside a single transaction.
///
/// Every statement is `INSERT ... ON CONFLICT DO NOTHING`, so re-applying
/// the same op list against existing state commits cleanly and changes
/// nothing. Returns the number of rows actually inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails; the
/// transaction rolls back and no partial state is visible.
pub async fn apply_write_ops(pool: &PgPool, ops: &[WriteOp]) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for op in ops {
        inserted += apply_one(&mut tx, op).await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn apply_one(tx: &mut Transaction<'_, Postgres>, op: &WriteOp) -> Result<u64, DbError> {
    let result = match op {
        WriteOp::Product(p) => {
            sqlx::query(
                "INSERT INTO products \
                     (sku, supplier_id, name, name_en, barcode, brand, description, \
                      ingredients, dimensions, weight_grams, origin, msrp, case_pack, \
                      is_public, is_active) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, \
                         $8, $9, $10, $11, $12, $13, \
                         TRUE, $14) \
                 ON CONFLICT (sku) DO NOTHING",
            )
            .bind(&p.sku)
            .bind(&p.supplier_id)
            .bind(&p.name)
            .bind(&p.name_en)
            .bind(&p.barcode)
            .bind(&p.brand)
            .bind(&p.description)
            .bind(&p.ingredients)
            .bind(&p.dimensions)
            .bind(p.weight_grams)
            .bind(&p.origin)
            .bind(p.msrp)
            .bind(&p.case_pack)
            .bind(p.is_active)
            .execute(&mut **tx)
            .await?
        }
        WriteOp::Inventory {
            sku,
            available_good,
            available_defective,
        } => {
            sqlx::query(
                "INSERT INTO product_inventory \
                     (sku, available_good, available_defective, last_synced_at) \
                 VALUES ($1, $2, $3, NOW()) \
                 ON CONFLICT (sku) DO NOTHING",
            )
            .bind(sku)
            .bind(available_good)
            .bind(available_defective)
            .execute(&mut **tx)
            .await?
        }
        WriteOp::Tag { sku, tag } => {
            sqlx::query(
                "INSERT INTO product_tags (sku, tag) \
                 VALUES ($1, $2) \
                 ON CONFLICT (sku, tag) DO NOTHING",
            )
            .bind(sku)
            .bind(tag)
            .execute(&mut **tx)
            .await?
        }
        WriteOp::Audience { sku, audience } => {
            sqlx::query(
                "INSERT INTO product_audience (sku, audience) \
                 VALUES ($1, $2) \
                 ON CONFLICT (sku, audience) DO NOTHING",
            )
            .bind(sku)
            .bind(audience.as_str())
            .execute(&mut **tx)
            .await?
        }
        WriteOp::Image {
            sku,
            storage_key,
            is_primary,
        } => {
            sqlx::query(
                "INSERT INTO product_images (sku, storage_key, is_primary) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (sku, storage_key) DO NOTHING",
            )
            .bind(sku)
            .bind(storage_key)
            .bind(is_primary)
            .execute(&mut **tx)
            .await?
        }
    };

    Ok(result.rows_affected())
}
