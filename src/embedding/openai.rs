use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::error::EmbeddingError;
use super::EmbeddingProvider;

/// OpenAI embeddings API client.
///
/// Speaks the `/v1/embeddings` wire format, which is also served by most
/// OpenAI-compatible gateways; point `base_url` at one to swap providers
/// without touching the cache.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dim: usize,
}

impl OpenAiEmbedder {
    /// Creates an embedder for `model` producing `dim`-element vectors.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dim: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            dim,
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = json!({
            "model": self.model,
            "input": text,
        });

        let response = self
            .client
            .post(self.embeddings_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(EmbeddingError::ProviderRejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingsResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::ResponseParseFailed {
                    reason: e.to_string(),
                })?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyResponse)?;

        if vector.len() != self.dim {
            return Err(EmbeddingError::InvalidDimension {
                expected: self.dim,
                actual: vector.len(),
            });
        }

        debug!(model = %self.model, dim = vector.len(), "Embedding generated");

        Ok(vector)
    }
}

impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.request_embedding(text).await
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeddings_url_strips_trailing_slash() {
        let embedder = OpenAiEmbedder::new(
            "http://localhost:8080/",
            "sk-test",
            "text-embedding-3-small",
            1536,
        );
        assert_eq!(
            embedder.embeddings_url(),
            "http://localhost:8080/v1/embeddings"
        );
    }

    #[test]
    fn test_response_parsing() {
        let raw = serde_json::json!({
            "model": "text-embedding-3-small",
            "data": [{"index": 0, "embedding": [0.1, 0.2, 0.3], "object": "embedding"}],
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        });

        let parsed: EmbeddingsResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_model_identity_is_fixed() {
        let embedder =
            OpenAiEmbedder::new("http://localhost", "sk-test", "text-embedding-3-small", 8);
        assert_eq!(embedder.model(), "text-embedding-3-small");
        assert_eq!(embedder.dim(), 8);
    }
}
