//! Integration tests against a real Postgres instance via `#[sqlx::test]`.

use pawsync_core::{AudienceTag, CanonicalProduct, ImageRef, WriteOp};
use pawsync_db::{apply_write_ops, ensure_supplier, get_supplier, NewImportRun};

fn sample_product(sku: &str, supplier_id: &str) -> CanonicalProduct {
    CanonicalProduct {
        sku: sku.to_string(),
        supplier_id: supplier_id.to_string(),
        name: "Chew Toy".to_string(),
        name_en: "Chew Toy".to_string(),
        barcode: Some("4901234567894".to_string()),
        brand: "PawBrand".to_string(),
        description: "Durable rubber chew toy for dogs".to_string(),
        ingredients: String::new(),
        dimensions: "10x4x4cm".to_string(),
        weight_grams: 120.0,
        origin: "US".to_string(),
        msrp: 1200,
        case_pack: "24".to_string(),
        is_active: true,
        category: Some("Dog Toys".to_string()),
        available_good: 0,
        available_defective: 0,
        images: vec![ImageRef {
            url: "https://img.example.com/signed/1".to_string(),
            position: 0,
        }],
    }
}

fn sample_ops(sku: &str, supplier_id: &str) -> Vec<WriteOp> {
    let product = sample_product(sku, supplier_id);
    let key = product.images[0].storage_key(supplier_id, sku);
    vec![
        WriteOp::Product(Box::new(product)),
        WriteOp::Inventory {
            sku: sku.to_string(),
            available_good: 0,
            available_defective: 0,
        },
        WriteOp::Tag {
            sku: sku.to_string(),
            tag: "Dog Toys".to_string(),
        },
        WriteOp::Audience {
            sku: sku.to_string(),
            audience: AudienceTag::Dog,
        },
        WriteOp::Image {
            sku: sku.to_string(),
            storage_key: key,
            is_primary: true,
        },
    ]
}

async fn count(pool: &sqlx::PgPool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .expect("count query")
}

#[sqlx::test(migrations = "../../migrations")]
async fn apply_write_ops_inserts_all_tables(pool: sqlx::PgPool) {
    ensure_supplier(&pool, "sup-1").await.expect("supplier");

    let inserted = apply_write_ops(&pool, &sample_ops("A1", "sup-1"))
        .await
        .expect("apply ops");
    assert_eq!(inserted, 5);

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM products").await, 1);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM product_inventory").await,
        1
    );
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM product_tags").await, 1);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM product_audience").await,
        1
    );
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM product_images").await, 1);

    let key: String = sqlx::query_scalar("SELECT storage_key FROM product_images")
        .fetch_one(&pool)
        .await
        .expect("storage key");
    assert_eq!(key, "sup-1/A1/image-1.jpg");
}

#[sqlx::test(migrations = "../../migrations")]
async fn apply_write_ops_twice_is_idempotent(pool: sqlx::PgPool) {
    ensure_supplier(&pool, "sup-1").await.expect("supplier");

    let ops = sample_ops("A1", "sup-1");
    let first = apply_write_ops(&pool, &ops).await.expect("first apply");
    let second = apply_write_ops(&pool, &ops).await.expect("second apply");

    assert_eq!(first, 5);
    assert_eq!(second, 0, "re-applied ops must all be no-ops");

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM products").await, 1);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM product_inventory").await,
        1
    );
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM product_tags").await, 1);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM product_audience").await,
        1
    );
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM product_images").await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn apply_write_ops_rolls_back_on_failure(pool: sqlx::PgPool) {
    // No supplier row: the products FK must fail and roll the whole batch back.
    let result = apply_write_ops(&pool, &sample_ops("A1", "missing-supplier")).await;
    assert!(result.is_err());

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM products").await, 0);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM product_inventory").await,
        0
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn ensure_supplier_creates_placeholder_once(pool: sqlx::PgPool) {
    let created = ensure_supplier(&pool, "Acme Pet Co.").await.expect("first");
    let again = ensure_supplier(&pool, "Acme Pet Co.").await.expect("second");

    assert!(created);
    assert!(!again);

    let row = get_supplier(&pool, "Acme Pet Co.").await.expect("fetch");
    assert_eq!(row.name, "Acme Pet Co.");
    assert_eq!(row.email, "acme-pet-co@suppliers.pawsync.invalid");
}

#[sqlx::test(migrations = "../../migrations")]
async fn ensure_supplier_preserves_existing_metadata(pool: sqlx::PgPool) {
    sqlx::query(
        "INSERT INTO suppliers (supplier_id, name, email) \
         VALUES ('sup-9', 'Real Name GmbH', 'orders@real.example.com')",
    )
    .execute(&pool)
    .await
    .expect("seed supplier");

    let created = ensure_supplier(&pool, "sup-9").await.expect("ensure");
    assert!(!created);

    let row = get_supplier(&pool, "sup-9").await.expect("fetch");
    assert_eq!(row.name, "Real Name GmbH");
    assert_eq!(row.email, "orders@real.example.com");
}

#[sqlx::test(migrations = "../../migrations")]
async fn import_runs_record_and_list(pool: sqlx::PgPool) {
    let id = pawsync_db::record_import_run(
        &pool,
        &NewImportRun {
            source: "csv",
            supplier_id: "sup-1",
            cursor_in: Some("3"),
            status: "succeeded",
            processed: 3,
            duration_ms: 1_500,
            error_message: None,
        },
    )
    .await
    .expect("record run");
    assert!(id > 0);

    let runs = pawsync_db::list_import_runs(&pool, 10).await.expect("list");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].source, "csv");
    assert_eq!(runs[0].cursor_in.as_deref(), Some("3"));
    assert_eq!(runs[0].processed, 3);
    assert!(runs[0].error_message.is_none());
}
