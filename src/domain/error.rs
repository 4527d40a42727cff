use thiserror::Error;

/// Core domain errors
///
/// Every failure of the ingestion and retrieval pipelines surfaces as one of these
/// variants. None of them is fatal to the process; callers decide how to present them.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Embedding service error: {provider} - {message}")]
    EmbeddingService { provider: String, message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Corrupt index: {message}")]
    CorruptIndex { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn embedding_service(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingService {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn corrupt_index(message: impl Into<String>) -> Self {
        Self::CorruptIndex {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Stable label used in logs and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found_error",
            Self::EmbeddingService { .. } => "embedding_service_error",
            Self::Persistence { .. } => "persistence_error",
            Self::CorruptIndex { .. } => "corrupt_index_error",
            Self::Io { .. } => "io_error",
            Self::Configuration { .. } => "configuration_error",
        }
    }
}
