//! The batch pipeline driver.
//!
//! One invocation processes exactly one source page: ensure suppliers,
//! normalize, classify, plan, replicate images, then commit every surviving
//! write op in a single transaction and report the next cursor to the
//! caller. Rows run sequentially in source order; the downstream services
//! are rate-limited and the commit wants the whole page anyway.

use std::time::Instant;

use serde::Serialize;
use sqlx::PgPool;

use pawsync_blob::{ImageOutcome, ImageReplicator};
use pawsync_classifier::{classify_audience, TextGenClient};
use pawsync_core::WriteOp;
use pawsync_db::NewImportRun;
use pawsync_source::CatalogSource;

use crate::context::BatchContext;
use crate::error::ImportError;
use crate::planner::plan_product_writes;

/// What one batch invocation reports back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Rows that made it through the full pipeline this call.
    pub processed: u32,
    /// Cursor to pass on the next call; `null` means the catalog is done.
    pub next_cursor: Option<String>,
    /// Rows left after this page, when the source knows its total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u64>,
    pub duration_seconds: f64,
    pub logs: Vec<String>,
}

/// Drives batches against one database and one set of enrichment services.
pub struct BatchImporter {
    pool: PgPool,
    classifier: TextGenClient,
    replicator: ImageReplicator,
    page_size: u32,
}

impl BatchImporter {
    #[must_use]
    pub fn new(
        pool: PgPool,
        classifier: TextGenClient,
        replicator: ImageReplicator,
        page_size: u32,
    ) -> Self {
        Self {
            pool,
            classifier,
            replicator,
            page_size,
        }
    }

    /// Runs one batch: fetch a page, process its rows, commit, report.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when the page fetch or the batch commit fails.
    /// Nothing is committed in that case; re-issuing the identical call is
    /// the retry path.
    pub async fn run_batch(
        &self,
        source: &dyn CatalogSource,
        fallback_supplier_id: &str,
        cursor: Option<&str>,
    ) -> Result<BatchReport, ImportError> {
        let started = Instant::now();

        let result = self
            .run_batch_inner(source, fallback_supplier_id, cursor, started)
            .await;

        if let Err(e) = &result {
            self.record_run(
                source.name(),
                fallback_supplier_id,
                cursor,
                "failed",
                0,
                started,
                Some(&e.to_string()),
            )
            .await;
        }
        result
    }

    async fn run_batch_inner(
        &self,
        source: &dyn CatalogSource,
        fallback_supplier_id: &str,
        cursor: Option<&str>,
        started: Instant,
    ) -> Result<BatchReport, ImportError> {
        let page = source.fetch_page(self.page_size, cursor).await?;

        // An empty page is the terminal condition even on the very first call.
        if page.rows.is_empty() {
            tracing::info!(source = source.name(), "empty page; import complete");
            self.record_run(
                source.name(),
                fallback_supplier_id,
                cursor,
                "succeeded",
                0,
                started,
                None,
            )
            .await;
            return Ok(BatchReport {
                processed: 0,
                next_cursor: None,
                remaining: page.remaining,
                duration_seconds: started.elapsed().as_secs_f64(),
                logs: Vec::new(),
            });
        }

        let mut ctx = BatchContext::new();
        for row in &page.rows {
            self.process_row(source, row, fallback_supplier_id, &mut ctx)
                .await;
        }

        if ctx.ops.is_empty() {
            tracing::warn!(
                source = source.name(),
                "page produced no write ops; skipping commit"
            );
            ctx.log("no write ops accumulated; commit skipped");
        } else {
            let inserted = pawsync_db::apply_write_ops(&self.pool, &ctx.ops).await?;
            tracing::info!(
                source = source.name(),
                ops = ctx.ops.len(),
                inserted,
                "batch committed"
            );
        }

        self.record_run(
            source.name(),
            fallback_supplier_id,
            cursor,
            "succeeded",
            ctx.processed,
            started,
            None,
        )
        .await;

        Ok(BatchReport {
            processed: ctx.processed,
            next_cursor: page.next_cursor,
            remaining: page.remaining,
            duration_seconds: started.elapsed().as_secs_f64(),
            logs: ctx.logs,
        })
    }

    /// Runs one row through normalize → classify → plan → replicate.
    ///
    /// Never fails the batch: a row with no SKU is skipped silently, a row
    /// whose supplier cannot be ensured is skipped with a logged error, and
    /// classifier/image trouble degrades to log lines.
    async fn process_row(
        &self,
        source: &dyn CatalogSource,
        row: &pawsync_source::SourceRow,
        fallback_supplier_id: &str,
        ctx: &mut BatchContext,
    ) {
        let Some(product) = source.normalize(row, fallback_supplier_id) else {
            // Missing SKU: not an error, not counted, not logged.
            return;
        };

        if !ctx.supplier_seen(&product.supplier_id) {
            match pawsync_db::ensure_supplier(&self.pool, &product.supplier_id).await {
                Ok(created) => {
                    ctx.mark_supplier(&product.supplier_id);
                    if created {
                        ctx.log(format!(
                            "auto-created placeholder supplier {}",
                            product.supplier_id
                        ));
                    }
                }
                Err(e) => {
                    tracing::error!(
                        sku = %product.sku,
                        supplier = %product.supplier_id,
                        error = %e,
                        "supplier ensure failed; skipping row"
                    );
                    ctx.log(format!(
                        "skipped {}: supplier {} unavailable ({e})",
                        product.sku, product.supplier_id
                    ));
                    return;
                }
            }
        }

        let classification = classify_audience(&self.classifier, &product, source.vocab()).await;
        if let Some(reason) = &classification.fallback_reason {
            ctx.log(format!("classifier fallback for {}: {reason}", product.sku));
        }

        let mut ops = plan_product_writes(&product, &classification.tags);

        let outcomes = self
            .replicator
            .replicate(&product.supplier_id, &product.sku, &product.images)
            .await;
        for outcome in outcomes {
            match outcome {
                ImageOutcome::Uploaded {
                    storage_key,
                    is_primary,
                    ..
                } => {
                    ctx.log(format!("uploaded {storage_key}"));
                    ops.push(WriteOp::Image {
                        sku: product.sku.clone(),
                        storage_key,
                        is_primary,
                    });
                }
                ImageOutcome::Failed { position, reason } => {
                    tracing::warn!(
                        sku = %product.sku,
                        position,
                        reason = %reason,
                        "image replication failed"
                    );
                    ctx.log(format!(
                        "image {} of {} failed: {reason}",
                        position + 1,
                        product.sku
                    ));
                }
            }
        }

        ctx.ops.append(&mut ops);
        ctx.processed += 1;
    }

    /// Best-effort bookkeeping; a failure here is logged, never fatal.
    #[allow(clippy::too_many_arguments)]
    async fn record_run(
        &self,
        source: &str,
        supplier_id: &str,
        cursor_in: Option<&str>,
        status: &str,
        processed: u32,
        started: Instant,
        error_message: Option<&str>,
    ) {
        let duration_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        let run = NewImportRun {
            source,
            supplier_id,
            cursor_in,
            status,
            processed: i32::try_from(processed).unwrap_or(i32::MAX),
            duration_ms,
            error_message,
        };
        if let Err(e) = pawsync_db::record_import_run(&self.pool, &run).await {
            tracing::error!(error = %e, "failed to record import run");
        }
    }
}
