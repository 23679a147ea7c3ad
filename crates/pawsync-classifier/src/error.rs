use thiserror::Error;

/// Errors from the text-generation client.
///
/// These never escape [`crate::classify_audience`]: a failed generation
/// collapses to the fallback tag and a log line.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from text-generation service")]
    UnexpectedStatus { status: u16 },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// The completion carried no message content.
    #[error("text-generation response contained no completion text")]
    EmptyCompletion,

    /// The configured base URL cannot be parsed.
    #[error("invalid text-generation base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
