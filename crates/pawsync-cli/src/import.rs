//! CLI drivers around the batch importer.

use anyhow::Context;

use pawsync_blob::{BlobClient, ImageReplicator};
use pawsync_classifier::TextGenClient;
use pawsync_core::AppConfig;
use pawsync_importer::{BatchImporter, BatchReport};
use pawsync_source::{CatalogSource, CsvSource, RecordsApiClient, RecordsApiSource};

use crate::SourceKind;

struct CliContext {
    importer: BatchImporter,
    source: Box<dyn CatalogSource>,
    supplier: String,
}

async fn build_context(
    config: &AppConfig,
    kind: SourceKind,
    supplier: Option<&str>,
) -> anyhow::Result<CliContext> {
    let pool_config = pawsync_db::PoolConfig::from_app_config(config);
    let pool = pawsync_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("connecting to database")?;
    pawsync_db::run_migrations(&pool)
        .await
        .context("running migrations")?;

    let blob = BlobClient::new(
        &config.blob_base_url,
        config.blob_token.as_deref(),
        config.http_timeout_secs,
        &config.http_user_agent,
    )?;
    let replicator = ImageReplicator::new(
        blob.clone(),
        config.http_timeout_secs,
        &config.http_user_agent,
    )?;
    let classifier = TextGenClient::new(
        &config.textgen_base_url,
        config.textgen_api_key.as_deref(),
        &config.textgen_model,
        config.textgen_timeout_secs,
        &config.http_user_agent,
    )?;

    let source: Box<dyn CatalogSource> = match kind {
        SourceKind::Csv => Box::new(CsvSource::new(blob, config.catalog_csv_key.clone())),
        SourceKind::Records => {
            let client = RecordsApiClient::new(
                &config.records_api_base_url,
                config.records_api_token.as_deref(),
                config.http_timeout_secs,
                &config.http_user_agent,
            )?;
            Box::new(RecordsApiSource::new(client))
        }
    };

    let importer = BatchImporter::new(pool, classifier, replicator, config.import_page_size);

    Ok(CliContext {
        importer,
        source,
        supplier: supplier
            .unwrap_or(&config.default_supplier_id)
            .to_owned(),
    })
}

fn print_report(report: &BatchReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// `pawsync-cli batch`: one page, one report.
pub async fn run_single_batch(
    config: &AppConfig,
    kind: SourceKind,
    supplier: Option<&str>,
    cursor: Option<&str>,
) -> anyhow::Result<()> {
    let ctx = build_context(config, kind, supplier).await?;
    let report = ctx
        .importer
        .run_batch(ctx.source.as_ref(), &ctx.supplier, cursor)
        .await?;
    print_report(&report)
}

/// `pawsync-cli run`: the client-side polling loop, feeding each returned
/// cursor into the next call until the source is exhausted.
pub async fn run_to_completion(
    config: &AppConfig,
    kind: SourceKind,
    supplier: Option<&str>,
) -> anyhow::Result<()> {
    let ctx = build_context(config, kind, supplier).await?;

    let mut cursor: Option<String> = None;
    let mut batches = 0u32;
    let mut total_processed = 0u32;

    loop {
        let report = ctx
            .importer
            .run_batch(ctx.source.as_ref(), &ctx.supplier, cursor.as_deref())
            .await?;
        batches += 1;
        total_processed += report.processed;

        for line in &report.logs {
            println!("  {line}");
        }
        tracing::info!(
            batch = batches,
            processed = report.processed,
            remaining = ?report.remaining,
            "batch complete"
        );

        match report.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    println!("imported {total_processed} products in {batches} batches");
    Ok(())
}

/// `pawsync-cli runs`: recent batch invocations, newest first.
pub async fn print_recent_runs(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool_config = pawsync_db::PoolConfig::from_app_config(config);
    let pool = pawsync_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("connecting to database")?;

    let runs = pawsync_db::list_import_runs(&pool, limit.clamp(1, 200)).await?;
    if runs.is_empty() {
        println!("no import runs recorded");
        return Ok(());
    }

    for run in runs {
        println!(
            "{}  {:<9} {:<8} processed={:<4} {}ms cursor={} {}",
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            run.status,
            run.source,
            run.processed,
            run.duration_ms,
            run.cursor_in.as_deref().unwrap_or("-"),
            run.error_message.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
