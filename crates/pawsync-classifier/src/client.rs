//! HTTP client for the OpenAI-compatible text-generation service.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;

use crate::error::ClassifierError;

/// Client for a `chat/completions`-style endpoint.
///
/// Use [`TextGenClient::new`] for production or point `base_url` at a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct TextGenClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

impl TextGenClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClassifierError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClassifierError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.map(str::to_owned),
            model: model.to_owned(),
        })
    }

    /// Sends one prompt and returns the completion text.
    ///
    /// Exactly one attempt: no retry, no backoff. The caller's fallback
    /// handles every failure mode uniformly.
    ///
    /// # Errors
    ///
    /// - [`ClassifierError::Http`] on network failure.
    /// - [`ClassifierError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ClassifierError::Deserialize`] if the body is not the expected
    ///   completion envelope.
    /// - [`ClassifierError::EmptyCompletion`] if no choice carries content.
    pub async fn generate(&self, prompt: &str) -> Result<String, ClassifierError> {
        let url =
            self.base_url
                .join("v1/chat/completions")
                .map_err(|e| ClassifierError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;

        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0,
        });

        let mut request = self.client.post(url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&response.text().await?)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ClassifierError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> TextGenClient {
        TextGenClient::new(base_url, Some("sk-test"), "test-model", 10, "pawsync-test/0.1")
            .expect("client construction should not fail")
    }

    #[tokio::test]
    async fn generate_returns_completion_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "[\"Dog\"]"}}],
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client.generate("classify this").await.expect("generate");
        assert_eq!(text, "[\"Dog\"]");
    }

    #[tokio::test]
    async fn generate_maps_non_2xx_to_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate("p").await.unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::UnexpectedStatus { status: 429 }
        ));
    }

    #[tokio::test]
    async fn generate_rejects_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate("p").await.unwrap_err();
        assert!(matches!(err, ClassifierError::EmptyCompletion));
    }

    #[tokio::test]
    async fn generate_rejects_blank_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "   "}}],
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate("p").await.unwrap_err();
        assert!(matches!(err, ClassifierError::EmptyCompletion));
    }
}
