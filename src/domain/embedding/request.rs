//! Embedding request types

use serde::{Deserialize, Serialize};

/// Request to generate embeddings
///
/// The model is not part of the request: a provider is bound to one model so that
/// ingestion and query vectors stay comparable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Input texts, embedded in order
    input: Vec<String>,
}

impl EmbeddingRequest {
    /// Create a request for a single text
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            input: vec![text.into()],
        }
    }

    /// Create a request for multiple texts
    pub fn batch(texts: Vec<String>) -> Self {
        Self { input: texts }
    }

    /// Get inputs as strings
    pub fn inputs(&self) -> Vec<&str> {
        self.input.iter().map(String::as_str).collect()
    }

    /// Consume the request and return its texts
    pub fn into_inputs(self) -> Vec<String> {
        self.input
    }

    /// Get the number of inputs
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}
