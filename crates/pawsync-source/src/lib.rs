//! Catalog sources: the paginated row providers behind the import pipeline.
//!
//! Each source kind implements [`CatalogSource`]: an async page fetch driven
//! by an opaque cursor, plus a pure normalizer from its raw row shape to
//! [`CanonicalProduct`]. The orchestrator depends only on this trait.

use async_trait::async_trait;
use pawsync_core::{AudienceVocab, CanonicalProduct};

mod csv_file;
mod error;
pub mod normalize;
mod records_api;
mod types;

pub use csv_file::CsvSource;
pub use error::SourceError;
pub use records_api::{RecordsApiClient, RecordsApiSource};
pub use types::{SourcePage, SourceRow};

/// A paginated catalog of raw product rows.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches one page of rows.
    ///
    /// `cursor == None` means start from the beginning; a returned
    /// `next_cursor == None` means the catalog is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on any fetch or parse failure — batch-fatal
    /// by design; the caller re-issues the same call to retry.
    async fn fetch_page(
        &self,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<SourcePage, SourceError>;

    /// Maps one raw row to the canonical shape, or `None` to skip it
    /// (missing SKU). Pure.
    fn normalize(&self, row: &SourceRow, fallback_supplier_id: &str) -> Option<CanonicalProduct>;

    /// The label vocabulary classifier prompts should use for this source.
    fn vocab(&self) -> AudienceVocab;

    /// Short identifier used in logs and import-run rows.
    fn name(&self) -> &'static str;
}
