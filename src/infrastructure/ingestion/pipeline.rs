//! Ingestion pipeline service

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::domain::embedding::{embed_batched, EmbeddingProvider};
use crate::domain::ingestion::{
    BatchIngestionResult, ChunkingStrategy, Document, FileSelection, IngestionConfig,
    IngestionOutcome, IngestionResult,
};
use crate::domain::knowledge_base::{
    KnowledgeBaseName, KnowledgeBaseStore, SourceType, VectorIndex,
};
use crate::domain::DomainError;

use super::chunkers::RecursiveChunker;
use super::locks::KeyedLocks;
use super::registry::ParserRegistry;

/// Ingestion pipeline turning selected files into knowledge bases
///
/// Each file goes through duplicate check, parsing, chunking, embedding and an atomic
/// commit. At most one ingestion per identity key runs at a time.
#[derive(Debug)]
pub struct IngestionPipeline {
    store: Arc<dyn KnowledgeBaseStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    parsers: ParserRegistry,
    chunker: Arc<dyn ChunkingStrategy>,
    config: IngestionConfig,
    locks: KeyedLocks,
}

impl IngestionPipeline {
    /// Create a new ingestion pipeline using the recursive chunker
    pub fn new(
        store: Arc<dyn KnowledgeBaseStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        parsers: ParserRegistry,
        config: IngestionConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        Ok(Self {
            store,
            embedder,
            parsers,
            chunker: Arc::new(RecursiveChunker::new()),
            config,
            locks: KeyedLocks::new(),
        })
    }

    /// Ingest the files of a selection dialog result
    pub async fn ingest_selection(&self, selection: FileSelection) -> IngestionOutcome {
        if selection.canceled {
            info!("File selection canceled, nothing to ingest");
            return IngestionOutcome::Aborted;
        }

        IngestionOutcome::Completed(self.ingest_paths(&selection.file_paths).await)
    }

    /// Ingest several files. Each file is processed independently: a rejected or
    /// failing file is reported in the result while the others proceed.
    pub async fn ingest_paths(&self, paths: &[PathBuf]) -> BatchIngestionResult {
        let outcomes: Vec<(String, Result<IngestionResult, DomainError>)> =
            stream::iter(paths.iter().cloned())
                .map(|path| async move {
                    let result = self.ingest_file(&path).await;
                    (path.display().to_string(), result)
                })
                .buffered(self.config.max_concurrent_files)
                .collect()
                .await;

        let mut batch = BatchIngestionResult::new();
        for (path, result) in outcomes {
            if let Err(ref e) = result {
                warn!(path = %path, kind = e.kind(), error = %e, "File not ingested");
            }
            batch.add(path, result);
        }

        info!(
            succeeded = batch.succeeded.len(),
            failed = batch.failed.len(),
            chunks = batch.total_chunks(),
            "Batch ingestion finished"
        );

        batch
    }

    /// Ingest one file into a new knowledge base named after its base name
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestionResult, DomainError> {
        let name = KnowledgeBaseName::from_path(path)?;
        let source_type = SourceType::from_path(path)?;
        let parser = self.parsers.get(source_type)?;

        let _guard = self.locks.acquire(name.as_str()).await;

        if self.store.exists(&name).await? {
            return Err(DomainError::validation(format!(
                "Knowledge base '{}' already exists",
                name
            )));
        }

        let documents = parser.parse(path).await?;
        if documents.iter().all(Document::is_blank) {
            return Err(DomainError::validation(format!(
                "'{}' is empty",
                path.display()
            )));
        }

        let chunks = self
            .chunker
            .chunk_documents(&documents, &self.config.chunking)?;
        if chunks.is_empty() {
            return Err(DomainError::validation(format!(
                "'{}' produced no chunks",
                path.display()
            )));
        }

        debug!(
            name = %name,
            documents = documents.len(),
            chunks = chunks.len(),
            chunker = self.chunker.name(),
            "Chunked file"
        );

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = embed_batched(self.embedder.as_ref(), &texts, self.config.batch_size).await?;

        let index = VectorIndex::build(self.embedder.model(), source_type, chunks, vectors)?;
        self.store.commit(&name, &index).await?;

        let result = IngestionResult::new(
            name.as_str(),
            source_type,
            index.len(),
            index.manifest().dimensions,
        );

        info!(
            name = %name,
            source_type = %source_type,
            chunks = result.chunks_created,
            dimensions = result.dimensions,
            "Knowledge base created"
        );

        Ok(result)
    }
}
