//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;
use tracing::debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (Ollama, test doubles, ...)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate one embedding per input text
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Model every vector of this provider is produced with
    fn model(&self) -> &str;
}

/// Embed `texts` in batches of `batch_size`, returning one vector per text in order.
///
/// Fails with an embedding service error when a batch returns the wrong number of
/// vectors, an empty vector, or dimensions that differ from earlier vectors.
pub async fn embed_batched(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, DomainError> {
    let batch_size = batch_size.max(1);
    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(texts.len());

    for (batch_idx, batch) in texts.chunks(batch_size).enumerate() {
        debug!(
            provider = provider.provider_name(),
            batch = batch_idx,
            size = batch.len(),
            "Embedding batch"
        );

        let response = provider
            .embed(EmbeddingRequest::batch(batch.to_vec()))
            .await?;

        if response.embeddings().len() != batch.len() {
            return Err(DomainError::embedding_service(
                provider.provider_name(),
                format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings().len()
                ),
            ));
        }

        for vector in response.into_vectors() {
            if vector.is_empty() {
                return Err(DomainError::embedding_service(
                    provider.provider_name(),
                    "received an empty embedding vector",
                ));
            }

            if let Some(first) = vectors.first() {
                if first.len() != vector.len() {
                    return Err(DomainError::embedding_service(
                        provider.provider_name(),
                        format!(
                            "inconsistent embedding dimensions: {} vs {}",
                            first.len(),
                            vector.len()
                        ),
                    ));
                }
            }

            vectors.push(vector);
        }
    }

    Ok(vectors)
}
