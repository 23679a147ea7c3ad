//! Raw row and page shapes shared by all catalog sources.

use serde_json::Value;

/// One raw record as the source produced it: a mapping from source-specific
/// field names to untyped values. Consumed exactly once by a normalizer.
#[derive(Debug, Clone, Default)]
pub struct SourceRow(pub serde_json::Map<String, Value>);

impl SourceRow {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Field as a string slice, when it is a JSON string.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// One fetched page of rows plus the cursor protocol state.
///
/// `next_cursor == None` is the terminal condition; `remaining` is populated
/// only by sources that know their total row count.
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    pub rows: Vec<SourceRow>,
    pub next_cursor: Option<String>,
    pub remaining: Option<u64>,
}
