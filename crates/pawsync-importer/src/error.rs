use thiserror::Error;

/// Batch-fatal failures.
///
/// Everything recoverable (classifier output, single images, one row's
/// supplier) is handled inside the pipeline and lands in the batch log
/// instead. What remains here aborts the whole invocation with no partial
/// commit; the caller retries by re-issuing the same call, which is safe
/// because all writes are insert-if-absent.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The source page could not be fetched or parsed.
    #[error("source error: {0}")]
    Source(#[from] pawsync_source::SourceError),

    /// The end-of-page batch commit failed at the store.
    #[error("database error: {0}")]
    Db(#[from] pawsync_db::DbError),
}
