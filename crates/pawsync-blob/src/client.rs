//! HTTP client for the S3-compatible blob store.
//!
//! Objects are addressed as `{base_url}/{key}`; writes carry the object's
//! content type and an optional bearer token. The store overwrites on PUT,
//! which is safe here because keys are derived deterministically from
//! supplier, sku, and image position.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::BlobError;

/// Client for the blob store's GET/PUT surface.
///
/// Use [`BlobClient::new`] for production or point `base_url` at a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct BlobClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl BlobClient {
    /// Creates a client for the store rooted at `base_url` (bucket included).
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`BlobError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, BlobError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Keep exactly one trailing slash so Url::join appends to the bucket
        // path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BlobError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token: token.map(str::to_owned),
        })
    }

    /// Fetches an object's raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::UnexpectedStatus`] on a non-2xx response or
    /// [`BlobError::Http`] on transport failure.
    pub async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError> {
        let url = self.object_url(key)?;
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BlobError::UnexpectedStatus {
                status: status.as_u16(),
                key: key.to_owned(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Uploads an object, overwriting any previous version under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::UnexpectedStatus`] on a non-2xx response or
    /// [`BlobError::Http`] on transport failure.
    pub async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError> {
        let url = self.object_url(key)?;
        let mut request = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BlobError::UnexpectedStatus {
                status: status.as_u16(),
                key: key.to_owned(),
            });
        }

        Ok(())
    }

    fn object_url(&self, key: &str) -> Result<Url, BlobError> {
        self.base_url
            .join(key.trim_start_matches('/'))
            .map_err(|e| BlobError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join key \"{key}\": {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> BlobClient {
        BlobClient::new(base_url, Some("blob-token"), 10, "pawsync-test/0.1")
            .expect("client construction should not fail")
    }

    #[tokio::test]
    async fn get_returns_object_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog/products.csv"))
            .and(header("authorization", "Bearer blob-token"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"sku,name\n".to_vec()))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let bytes = client.get("catalog/products.csv").await.expect("get");
        assert_eq!(bytes, b"sku,name\n");
    }

    #[tokio::test]
    async fn get_maps_missing_object_to_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get("missing/key").await.unwrap_err();
        assert!(
            matches!(err, BlobError::UnexpectedStatus { status: 404, ref key } if key == "missing/key"),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn put_sends_content_type_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/sup-1/A1/image-1.jpg"))
            .and(header("content-type", "image/png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client
            .put("sup-1/A1/image-1.jpg", vec![1, 2, 3], "image/png")
            .await
            .expect("put");
    }

    #[tokio::test]
    async fn put_surfaces_store_errors() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.put("k", vec![0], "image/jpeg").await.unwrap_err();
        assert!(matches!(err, BlobError::UnexpectedStatus { status: 500, .. }));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = BlobClient::new("not a url", None, 10, "ua").unwrap_err();
        assert!(matches!(err, BlobError::InvalidBaseUrl { .. }));
    }
}
