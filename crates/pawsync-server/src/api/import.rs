//! The batch import endpoint and run history listing.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawsync_importer::ImportError;
use pawsync_source::{CatalogSource, CsvSource, RecordsApiSource, SourceError};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub struct ImportBatchParams {
    /// Which catalog to read: `csv` (default) or `records`.
    pub source: Option<String>,
    /// Fallback supplier id for rows that carry none.
    pub supplier: Option<String>,
    /// Cursor returned by the previous call; omit to start from the top.
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListRunsParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ImportRunItem {
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

/// `GET /api/v1/import/batch` — process one page and report progress.
///
/// The caller drives the import to completion by passing each response's
/// `next_cursor` back in; a `null` cursor means the catalog is exhausted.
pub async fn import_batch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ImportBatchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let source = build_source(&state, params.source.as_deref(), &req_id.0)?;
    let supplier = params
        .supplier
        .as_deref()
        .unwrap_or(&state.config.default_supplier_id);

    let report = state
        .importer
        .run_batch(source.as_ref(), supplier, params.cursor.as_deref())
        .await
        .map_err(|e| map_import_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/import/runs` — recent batch invocations, newest first.
pub async fn list_runs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ListRunsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let runs = pawsync_db::list_import_runs(&state.pool, limit)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "listing import runs failed");
            ApiError::new(req_id.0.clone(), "internal_error", "database query failed")
        })?;

    let items: Vec<ImportRunItem> = runs
        .into_iter()
        .map(|run| ImportRunItem {
            public_id: run.public_id,
            source: run.source,
            supplier_id: run.supplier_id,
            cursor_in: run.cursor_in,
            status: run.status,
            processed: run.processed,
            duration_ms: run.duration_ms,
            error_message: run.error_message,
            created_at: run.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data: items,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn build_source(
    state: &AppState,
    source: Option<&str>,
    request_id: &str,
) -> Result<Box<dyn CatalogSource>, ApiError> {
    match source.unwrap_or("csv") {
        "csv" => Ok(Box::new(CsvSource::new(
            state.blob.clone(),
            state.config.catalog_csv_key.clone(),
        ))),
        "records" => Ok(Box::new(RecordsApiSource::new(state.records.clone()))),
        other => Err(ApiError::new(
            request_id.to_owned(),
            "validation_error",
            format!("unknown source \"{other}\"; expected \"csv\" or \"records\""),
        )),
    }
}

fn map_import_error(request_id: String, error: &ImportError) -> ApiError {
    tracing::error!(error = %error, "batch import failed");
    match error {
        ImportError::Source(SourceError::InvalidCursor(cursor)) => ApiError::new(
            request_id,
            "bad_request",
            format!("invalid cursor \"{cursor}\""),
        ),
        ImportError::Source(e) => ApiError::new(
            request_id,
            "upstream_error",
            format!("source fetch failed: {e}"),
        ),
        ImportError::Db(e) => {
            ApiError::new(request_id, "internal_error", format!("commit failed: {e}"))
        }
    }
}
