//! docchat-rag
//!
//! Knowledge base ingestion and retrieval for chatting with documents:
//! - One knowledge base per ingested file, named after the file
//! - Overlapping character chunks embedded through a local embedding service
//! - Filesystem vector indexes committed atomically
//! - Retrieval building a grounded prompt with page and line citations

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::{DomainError, EmbeddingProvider, KnowledgeBaseStore};
use infrastructure::{
    embedding::{HttpClient, OllamaEmbeddingProvider},
    ingestion::{IngestionPipeline, ParserRegistry},
    knowledge_base::{FsKnowledgeBaseStore, RetrievalPipeline},
};

/// Create the shared services from the loaded configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> Result<AppState, DomainError> {
    config.validate()?;

    let fs_store = FsKnowledgeBaseStore::open(&config.storage.documents_root).await?;
    fs_store
        .sweep_stale_staging(Duration::from_secs(config.storage.staging_ttl_secs))
        .await;
    let store: Arc<dyn KnowledgeBaseStore> = Arc::new(fs_store);
    let embedder = create_embedding_provider(config)?;

    let ingestion = IngestionPipeline::new(
        store.clone(),
        embedder.clone(),
        ParserRegistry::with_defaults(),
        config.ingestion_config(),
    )?;
    let retrieval = RetrievalPipeline::new(store.clone(), embedder, config.retrieval.clone());

    Ok(AppState::new(store, ingestion, retrieval))
}

fn create_embedding_provider(
    config: &AppConfig,
) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
    let client = HttpClient::with_timeout(Duration::from_secs(config.embedding.timeout_secs))?;

    Ok(Arc::new(OllamaEmbeddingProvider::with_base_url(
        client,
        &config.embedding.base_url,
        &config.embedding.model,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_app_state_creates_documents_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.documents_root = dir.path().join("knowledge_bases");

        let state = create_app_state_with_config(&config).await.unwrap();

        assert!(config.storage.documents_root.is_dir());
        assert!(state.store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_app_state_keeps_recent_staging() {
        let dir = tempfile::tempdir().unwrap();
        let in_flight = dir.path().join(infrastructure::knowledge_base::STAGING_DIR).join("commit");
        std::fs::create_dir_all(&in_flight).unwrap();

        let mut config = AppConfig::default();
        config.storage.documents_root = dir.path().to_path_buf();
        create_app_state_with_config(&config).await.unwrap();

        assert!(in_flight.is_dir());
    }

    #[tokio::test]
    async fn test_create_app_state_rejects_invalid_chunking() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.documents_root = dir.path().to_path_buf();
        config.chunking.chunk_overlap = config.chunking.chunk_size;

        let err = create_app_state_with_config(&config).await.err().unwrap();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }
}
