//! Blob storage client and the image replication step of the import pipeline.

mod client;
mod error;
mod replicate;

pub use client::BlobClient;
pub use error::BlobError;
pub use replicate::{ImageOutcome, ImageReplicator, DEFAULT_IMAGE_CONTENT_TYPE};
