//! Audience classification via the external text-generation service.
//!
//! One call per product, no retry. Every failure mode — transport, non-2xx,
//! unparseable or empty output — is recovered locally: the product gets the
//! single fallback tag and the reason is reported for the batch log. Nothing
//! in this crate can abort a row or a batch.

mod client;
mod error;
mod parse;
mod prompt;

use pawsync_core::{AudienceTag, AudienceVocab, CanonicalProduct};

pub use client::TextGenClient;
pub use error::ClassifierError;
pub use parse::parse_tags;
pub use prompt::{build_audience_prompt, DESCRIPTION_LIMIT};

/// Result of classifying one product.
///
/// `fallback_reason` is `Some` when the tags are the fallback rather than a
/// parsed model answer; the orchestrator turns it into a batch log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub tags: Vec<AudienceTag>,
    pub fallback_reason: Option<String>,
}

impl Classification {
    fn fallback(reason: String) -> Self {
        Self {
            tags: vec![AudienceTag::Other],
            fallback_reason: Some(reason),
        }
    }
}

/// Classifies one product's audience. Infallible by contract.
pub async fn classify_audience(
    client: &TextGenClient,
    product: &CanonicalProduct,
    vocab: AudienceVocab,
) -> Classification {
    let prompt = build_audience_prompt(product, vocab);

    let completion = match client.generate(&prompt).await {
        Ok(completion) => completion,
        Err(e) => {
            tracing::warn!(sku = %product.sku, error = %e, "classifier call failed; using fallback tag");
            return Classification::fallback(format!("generation failed: {e}"));
        }
    };

    match parse_tags(&completion) {
        Some(tags) => Classification {
            tags,
            fallback_reason: None,
        },
        None => {
            tracing::warn!(
                sku = %product.sku,
                completion = %completion,
                "classifier output unparseable; using fallback tag"
            );
            Classification::fallback("unparseable classifier output".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn product() -> CanonicalProduct {
        CanonicalProduct {
            sku: "A1".to_string(),
            supplier_id: "sup-1".to_string(),
            name: "Chew Toy".to_string(),
            name_en: String::new(),
            barcode: None,
            brand: String::new(),
            description: "Durable rubber chew toy for dogs".to_string(),
            ingredients: String::new(),
            dimensions: String::new(),
            weight_grams: 0.0,
            origin: String::new(),
            msrp: 0,
            case_pack: String::new(),
            is_active: true,
            category: Some("Dog Toys".to_string()),
            available_good: 0,
            available_defective: 0,
            images: Vec::new(),
        }
    }

    async fn client_for(server: &MockServer) -> TextGenClient {
        TextGenClient::new(&server.uri(), None, "test-model", 10, "pawsync-test/0.1")
            .expect("client")
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    #[tokio::test]
    async fn parsed_answer_carries_no_fallback_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("[\"Dog\"]")))
            .mount(&server)
            .await;

        let result =
            classify_audience(&client_for(&server).await, &product(), AudienceVocab::english())
                .await;
        assert_eq!(result.tags, vec![AudienceTag::Dog]);
        assert!(result.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn transport_failure_falls_back_to_other() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result =
            classify_audience(&client_for(&server).await, &product(), AudienceVocab::english())
                .await;
        assert_eq!(result.tags, vec![AudienceTag::Other]);
        assert!(result
            .fallback_reason
            .as_deref()
            .is_some_and(|r| r.contains("generation failed")));
    }

    #[tokio::test]
    async fn prose_answer_falls_back_to_other() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("It is for dogs.")),
            )
            .mount(&server)
            .await;

        let result =
            classify_audience(&client_for(&server).await, &product(), AudienceVocab::english())
                .await;
        assert_eq!(result.tags, vec![AudienceTag::Other]);
        assert_eq!(
            result.fallback_reason.as_deref(),
            Some("unparseable classifier output")
        );
    }

    #[tokio::test]
    async fn fenced_answer_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("```json\n[\"Dog\", \"Cat\"]\n```")),
            )
            .mount(&server)
            .await;

        let result =
            classify_audience(&client_for(&server).await, &product(), AudienceVocab::english())
                .await;
        assert_eq!(result.tags, vec![AudienceTag::Dog, AudienceTag::Cat]);
        assert!(result.fallback_reason.is_none());
    }
}
