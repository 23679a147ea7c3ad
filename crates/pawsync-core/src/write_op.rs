//! Typed descriptions of the idempotent statements a batch commits.

use crate::audience::AudienceTag;
use crate::product::CanonicalProduct;

/// One insert-if-absent statement against the relational store.
///
/// Ops are pure data: the persistence planner emits them, the db layer
/// materializes them inside a single transaction. Re-applying any op against
/// existing state is a no-op, never an error — that contract is what makes a
/// whole batch safely retryable.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert into `products`, keyed by sku.
    Product(Box<CanonicalProduct>),
    /// Insert into `product_inventory`, keyed by sku; stamps `last_synced_at`.
    Inventory {
        sku: String,
        available_good: i32,
        available_defective: i32,
    },
    /// Insert into `product_tags`, keyed by (sku, tag).
    Tag { sku: String, tag: String },
    /// Insert into `product_audience`, keyed by (sku, audience).
    Audience { sku: String, audience: AudienceTag },
    /// Insert into `product_images`, keyed by (sku, storage key).
    Image {
        sku: String,
        storage_key: String,
        is_primary: bool,
    },
}

impl WriteOp {
    /// The sku this op belongs to, for log lines.
    #[must_use]
    pub fn sku(&self) -> &str {
        match self {
            WriteOp::Product(p) => &p.sku,
            WriteOp::Inventory { sku, .. }
            | WriteOp::Tag { sku, .. }
            | WriteOp::Audience { sku, .. }
            | WriteOp::Image { sku, .. } => sku,
        }
    }
}
