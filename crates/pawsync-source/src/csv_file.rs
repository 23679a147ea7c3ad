//! The supplier catalog sheet: a CSV object in blob storage, paginated by
//! row offset.
//!
//! The sheet is re-fetched on every batch call. That keeps the source
//! stateless across invocations at the cost of one blob GET per page, which
//! is cheap next to the page's image replication. The cursor is the decimal
//! row offset of the next unread row.

use async_trait::async_trait;
use pawsync_blob::BlobClient;
use pawsync_core::{AudienceVocab, CanonicalProduct};

use crate::error::SourceError;
use crate::normalize::normalize_sheet_row;
use crate::types::{SourcePage, SourceRow};
use crate::CatalogSource;

/// The CSV catalog sheet as a [`CatalogSource`].
#[derive(Debug, Clone)]
pub struct CsvSource {
    blob: BlobClient,
    object_key: String,
}

impl CsvSource {
    #[must_use]
    pub fn new(blob: BlobClient, object_key: impl Into<String>) -> Self {
        Self {
            blob,
            object_key: object_key.into(),
        }
    }

    fn parse_rows(bytes: &[u8]) -> Result<Vec<SourceRow>, SourceError> {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut fields = serde_json::Map::new();
            for (header, value) in headers.iter().zip(record.iter()) {
                fields.insert(
                    header.to_owned(),
                    serde_json::Value::String(value.to_owned()),
                );
            }
            rows.push(SourceRow(fields));
        }
        Ok(rows)
    }
}

/// Slices one page out of the full row list.
///
/// Returns the page rows, the next cursor (`None` once the offset passes the
/// end), and how many rows remain after this page.
fn paginate(rows: Vec<SourceRow>, page_size: u32, offset: usize) -> SourcePage {
    let total = rows.len();
    let start = offset.min(total);
    let end = start.saturating_add(page_size as usize).min(total);

    let page: Vec<SourceRow> = rows.into_iter().skip(start).take(end - start).collect();
    let next_cursor = if end < total {
        Some(end.to_string())
    } else {
        None
    };

    SourcePage {
        rows: page,
        next_cursor,
        remaining: Some((total - end) as u64),
    }
}

#[async_trait]
impl CatalogSource for CsvSource {
    async fn fetch_page(
        &self,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<SourcePage, SourceError> {
        let offset = match cursor {
            None => 0,
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| SourceError::InvalidCursor(raw.to_owned()))?,
        };

        let bytes = self.blob.get(&self.object_key).await?;
        let rows = Self::parse_rows(&bytes)?;
        Ok(paginate(rows, page_size, offset))
    }

    fn normalize(&self, row: &SourceRow, fallback_supplier_id: &str) -> Option<CanonicalProduct> {
        normalize_sheet_row(row, fallback_supplier_id)
    }

    fn vocab(&self) -> AudienceVocab {
        AudienceVocab::supplier_sheet()
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
