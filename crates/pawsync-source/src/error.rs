use thiserror::Error;

/// Errors from catalog sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The records API answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The catalog sheet could not be parsed as CSV.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The sheet could not be fetched from blob storage.
    #[error(transparent)]
    Blob(#[from] pawsync_blob::BlobError),

    /// The caller passed back a cursor this source did not produce.
    #[error("invalid pagination cursor \"{0}\"")]
    InvalidCursor(String),

    /// The configured base URL cannot be parsed.
    #[error("invalid records API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
