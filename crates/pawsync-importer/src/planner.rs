//! Pure planning of a product's write ops.

use pawsync_core::{AudienceTag, CanonicalProduct, WriteOp};

/// Plans the non-image write ops for one product.
///
/// Always exactly one `Product` and one `Inventory` op. A `Tag` op only when
/// the category is non-empty. One `Audience` op per tag (the classifier
/// guarantees at least the fallback tag under normal operation). `Image` ops
/// are not planned here — the orchestrator appends them per confirmed
/// upload.
#[must_use]
pub fn plan_product_writes(product: &CanonicalProduct, tags: &[AudienceTag]) -> Vec<WriteOp> {
    let sku = product.sku.clone();
    let mut ops = Vec::with_capacity(2 + 1 + tags.len());

    ops.push(WriteOp::Inventory {
        sku: sku.clone(),
        available_good: product.available_good,
        available_defective: product.available_defective,
    });

    if let Some(category) = product.category.as_deref() {
        if !category.trim().is_empty() {
            ops.push(WriteOp::Tag {
                sku: sku.clone(),
                tag: category.to_owned(),
            });
        }
    }

    for tag in tags {
        ops.push(WriteOp::Audience {
            sku: sku.clone(),
            audience: *tag,
        });
    }

    // The product row leads so the FK targets exist before dependent rows
    // inside the same transaction.
    ops.insert(0, WriteOp::Product(Box::new(product.clone())));
    ops
}
