use thiserror::Error;

/// Errors from the blob store client.
#[derive(Debug, Error)]
pub enum BlobError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-2xx status.
    #[error("unexpected HTTP status {status} for blob {key}")]
    UnexpectedStatus { status: u16, key: String },

    /// The configured base URL cannot be parsed.
    #[error("invalid blob base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
