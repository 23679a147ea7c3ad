//! HTTP client for the third-party table records API.
//!
//! Wraps `reqwest` with typed error handling and bearer-token auth. The API
//! pages with an opaque `page_token`; a missing or empty token in the
//! response means the listing is exhausted.

use std::time::Duration;

use async_trait::async_trait;
use pawsync_core::{AudienceVocab, CanonicalProduct};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::SourceError;
use crate::normalize::normalize_records_row;
use crate::types::{SourcePage, SourceRow};
use crate::CatalogSource;

/// Client for the records API's `list` endpoint.
///
/// Use [`RecordsApiClient::new`] for production or point `base_url` at a
/// mock server in tests.
#[derive(Debug, Clone)]
pub struct RecordsApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<RecordEnvelope>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordEnvelope {
    #[serde(default)]
    fields: serde_json::Map<String, serde_json::Value>,
}

impl RecordsApiClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SourceError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Keep exactly one trailing slash so query_pairs_mut writes against
        // the listing path rather than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SourceError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token: token.map(str::to_owned),
        })
    }

    /// Fetches one page of records.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SourceError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn list_records(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<(Vec<SourceRow>, Option<String>), SourceError> {
        let url = self.list_url(page_size, page_token)?;

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: ListResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let rows = parsed
            .records
            .into_iter()
            .map(|record| SourceRow(record.fields))
            .collect();
        let next = parsed.next_page_token.filter(|token| !token.is_empty());

        Ok((rows, next))
    }

    fn list_url(&self, page_size: u32, page_token: Option<&str>) -> Result<Url, SourceError> {
        let mut url =
            self.base_url
                .join("records")
                .map_err(|e| SourceError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page_size", &page_size.to_string());
            if let Some(token) = page_token {
                pairs.append_pair("page_token", token);
            }
        }
        Ok(url)
    }
}

/// The records API as a [`CatalogSource`].
#[derive(Debug, Clone)]
pub struct RecordsApiSource {
    client: RecordsApiClient,
}

impl RecordsApiSource {
    #[must_use]
    pub fn new(client: RecordsApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for RecordsApiSource {
    async fn fetch_page(
        &self,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<SourcePage, SourceError> {
        let (rows, next_cursor) = self.client.list_records(page_size, cursor).await?;
        Ok(SourcePage {
            rows,
            next_cursor,
            // The listing endpoint reports no total; remaining is unknown.
            remaining: None,
        })
    }

    fn normalize(&self, row: &SourceRow, fallback_supplier_id: &str) -> Option<CanonicalProduct> {
        normalize_records_row(row, fallback_supplier_id)
    }

    fn vocab(&self) -> AudienceVocab {
        AudienceVocab::english()
    }

    fn name(&self) -> &'static str {
        "records"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> RecordsApiClient {
        RecordsApiClient::new(base_url, Some("api-token"), 10, "pawsync-test/0.1")
            .expect("client construction should not fail")
    }

    #[test]
    fn list_url_includes_page_size_and_token() {
        let client = test_client("https://tables.example.com/api/v1");
        let url = client.list_url(3, Some("tok123")).expect("url");
        assert_eq!(
            url.as_str(),
            "https://tables.example.com/api/v1/records?page_size=3&page_token=tok123"
        );
    }

    #[test]
    fn list_url_omits_token_on_first_page() {
        let client = test_client("https://tables.example.com/api/v1/");
        let url = client.list_url(3, None).expect("url");
        assert_eq!(
            url.as_str(),
            "https://tables.example.com/api/v1/records?page_size=3"
        );
    }

    #[tokio::test]
    async fn list_records_parses_rows_and_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/records"))
            .and(query_param("page_size", "2"))
            .and(header("authorization", "Bearer api-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [
                    {"record_id": "r1", "fields": {"sku": "A1", "name": "Chew Toy"}},
                    {"record_id": "r2", "fields": {"sku": "A2", "name": "Cat Wand"}},
                ],
                "next_page_token": "tok-2",
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let (rows, next) = client.list_records(2, None).await.expect("list");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].str_field("sku"), Some("A1"));
        assert_eq!(next.as_deref(), Some("tok-2"));
    }

    #[tokio::test]
    async fn list_records_treats_missing_token_as_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [],
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let (rows, next) = client.list_records(3, Some("tok-9")).await.expect("list");
        assert!(rows.is_empty());
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn list_records_treats_empty_token_as_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [{"fields": {"sku": "A9"}}],
                "next_page_token": "",
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let (_, next) = client.list_records(3, None).await.expect("list");
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn list_records_surfaces_upstream_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.list_records(3, None).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::UnexpectedStatus { status: 502, .. }
        ));
    }

    #[tokio::test]
    async fn list_records_surfaces_malformed_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.list_records(3, None).await.unwrap_err();
        assert!(matches!(err, SourceError::Deserialize { .. }));
    }
}
