//! Mirrors a product's images from their source URLs into blob storage.

use std::time::Duration;

use pawsync_core::ImageRef;
use reqwest::Client;

use crate::client::BlobClient;
use crate::error::BlobError;

/// Content type recorded when the image origin omits one. Source links are
/// almost always JPEG behind extension-less signed URLs.
pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Failure reasons are truncated to keep batch log lines bounded.
const MAX_REASON_LEN: usize = 160;

/// Outcome of replicating one image, reported independently per image so a
/// single failure never hides its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Uploaded {
        position: u32,
        storage_key: String,
        is_primary: bool,
    },
    Failed {
        position: u32,
        reason: String,
    },
}

/// Fetches product images and uploads them to blob storage.
///
/// Uploads are awaited before the caller records any database row for the
/// image, so `product_images` never references a blob that failed to land.
#[derive(Debug, Clone)]
pub struct ImageReplicator {
    http: Client,
    blob: BlobClient,
}

impl ImageReplicator {
    /// Creates a replicator with its own origin-fetch client.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Http`] if the fetch client cannot be constructed.
    pub fn new(blob: BlobClient, timeout_secs: u64, user_agent: &str) -> Result<Self, BlobError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { http, blob })
    }

    /// Replicates each image in order, returning one outcome per image.
    ///
    /// Never returns an error: every failure is captured in the outcome for
    /// that image and the remaining images still run.
    pub async fn replicate(
        &self,
        supplier_id: &str,
        sku: &str,
        images: &[ImageRef],
    ) -> Vec<ImageOutcome> {
        let mut outcomes = Vec::with_capacity(images.len());
        for image in images {
            outcomes.push(self.replicate_one(supplier_id, sku, image).await);
        }
        outcomes
    }

    async fn replicate_one(&self, supplier_id: &str, sku: &str, image: &ImageRef) -> ImageOutcome {
        let storage_key = image.storage_key(supplier_id, sku);

        let response = match self.http.get(&image.url).send().await {
            Ok(response) => response,
            Err(e) => {
                return ImageOutcome::Failed {
                    position: image.position,
                    reason: truncate_reason(&format!("fetch failed: {e}")),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            return ImageOutcome::Failed {
                position: image.position,
                reason: truncate_reason(&format!(
                    "origin returned {} for {}",
                    status.as_u16(),
                    image.url
                )),
            };
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE)
            .to_owned();

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                return ImageOutcome::Failed {
                    position: image.position,
                    reason: truncate_reason(&format!("read body failed: {e}")),
                };
            }
        };

        match self.blob.put(&storage_key, bytes, &content_type).await {
            Ok(()) => ImageOutcome::Uploaded {
                position: image.position,
                is_primary: image.is_primary(),
                storage_key,
            },
            Err(e) => ImageOutcome::Failed {
                position: image.position,
                reason: truncate_reason(&format!("upload failed: {e}")),
            },
        }
    }
}

fn truncate_reason(reason: &str) -> String {
    if reason.chars().count() <= MAX_REASON_LEN {
        return reason.to_owned();
    }
    let truncated: String = reason.chars().take(MAX_REASON_LEN).collect();
    format!("{truncated}…")
}
