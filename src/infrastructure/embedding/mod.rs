//! Embedding provider implementations

mod ollama;

pub use ollama::{OllamaEmbeddingProvider, DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};

// Re-export HTTP client for use by embedding providers
pub use super::http_client::{HttpClient, HttpClientTrait};
