//! Ollama embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::embedding::{Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "all-minilm";

/// Embedding provider backed by a local Ollama server
#[derive(Debug)]
pub struct OllamaEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OllamaEmbeddingProvider<C> {
    /// Create a provider for `model` on the default local server
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self::with_base_url(client, DEFAULT_OLLAMA_BASE_URL, model)
    }

    /// Create a provider with a custom base URL
    pub fn with_base_url(client: C, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            model: model.into(),
        }
    }

    fn embed_url(&self) -> String {
        format!("{}/api/embed", self.base_url)
    }

    fn build_request(&self, request: &EmbeddingRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "input": request.inputs(),
        })
    }

    fn parse_response(
        &self,
        json: serde_json::Value,
        expected: usize,
    ) -> Result<EmbeddingResponse, DomainError> {
        let response: OllamaEmbedResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::embedding_service(
                "ollama",
                format!("Failed to parse embedding response: {}", e),
            )
        })?;

        if response.embeddings.len() != expected {
            return Err(DomainError::embedding_service(
                "ollama",
                format!(
                    "expected {} embeddings, got {}",
                    expected,
                    response.embeddings.len()
                ),
            ));
        }

        let embeddings: Vec<Embedding> = response
            .embeddings
            .into_iter()
            .enumerate()
            .map(|(idx, vector)| Embedding::new(idx, vector))
            .collect();

        let response =
            EmbeddingResponse::new(response.model.unwrap_or_else(|| self.model.clone()), embeddings);

        if expected > 0 && response.dimensions().is_none_or(|d| d == 0) {
            return Err(DomainError::embedding_service(
                "ollama",
                "embeddings are empty or have inconsistent dimensions",
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OllamaEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        if request.is_empty() {
            return Ok(EmbeddingResponse::new(self.model.clone(), vec![]));
        }

        let body = self.build_request(&request);
        let response = self.client.post_json(&self.embed_url(), &body).await?;

        self.parse_response(response, request.len())
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    #[serde(default)]
    model: Option<String>,
    embeddings: Vec<Vec<f32>>,
}
