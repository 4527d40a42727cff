//! Retrieval pipeline service

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::knowledge_base::{
    GroundedPrompt, KnowledgeBaseName, KnowledgeBaseStore, RetrievalResult, SourceType,
    VectorIndex,
};
use crate::domain::DomainError;

/// Retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks placed in the prompt
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    4
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Answers queries against one knowledge base at a time
///
/// Every call reloads the index from the store. Nothing is cached between queries.
#[derive(Debug)]
pub struct RetrievalPipeline {
    store: Arc<dyn KnowledgeBaseStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: RetrievalConfig,
}

impl RetrievalPipeline {
    pub fn new(
        store: Arc<dyn KnowledgeBaseStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    /// Retrieve context for `query` and build a grounded prompt, citing hits in the
    /// style of `source_type`
    pub async fn retrieve(
        &self,
        name: &str,
        source_type: SourceType,
        query: &str,
    ) -> Result<GroundedPrompt, DomainError> {
        let (index, result) = self.search(name, query).await?;

        if index.manifest().source_type != source_type {
            info!(
                name = %name,
                requested = %source_type,
                recorded = %index.manifest().source_type,
                "Citing with requested source type"
            );
        }

        result.into_grounded_prompt(source_type.citation_style())
    }

    /// Same as `retrieve`, citing in the style of the source type recorded at ingestion
    pub async fn retrieve_with_recorded_type(
        &self,
        name: &str,
        query: &str,
    ) -> Result<GroundedPrompt, DomainError> {
        let (index, result) = self.search(name, query).await?;
        result.into_grounded_prompt(index.manifest().source_type.citation_style())
    }

    async fn search(
        &self,
        name: &str,
        query: &str,
    ) -> Result<(VectorIndex, RetrievalResult), DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::validation("Query cannot be empty"));
        }

        let name = KnowledgeBaseName::new(name)
            .map_err(|_| DomainError::not_found(format!("Knowledge base '{}' not found", name)))?;

        let index = self.store.load(&name).await?;

        if index.manifest().model != self.embedder.model() {
            return Err(DomainError::corrupt_index(format!(
                "Knowledge base '{}' was built with model '{}' but '{}' is configured",
                name,
                index.manifest().model,
                self.embedder.model()
            )));
        }

        let vector = self
            .embedder
            .embed(EmbeddingRequest::single(query))
            .await?
            .into_vectors()
            .into_iter()
            .next()
            .ok_or_else(|| {
                DomainError::embedding_service(
                    self.embedder.provider_name(),
                    "no embedding returned for query",
                )
            })?;

        let hits = index.search(&vector, self.config.top_k)?;

        info!(
            name = %name,
            hits = hits.len(),
            best_score = hits.first().map(|h| h.score).unwrap_or_default(),
            "Retrieved context"
        );

        Ok((index, RetrievalResult::new(query, hits)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::ingestion::{Document, DocumentMetadata, IngestionConfig, MockDocumentParser};
    use crate::infrastructure::ingestion::{IngestionPipeline, ParserRegistry};
    use crate::infrastructure::knowledge_base::FsKnowledgeBaseStore;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        files: TempDir,
        store: Arc<FsKnowledgeBaseStore>,
        embedder: Arc<MockEmbeddingProvider>,
        ingestion: IngestionPipeline,
        retrieval: RetrievalPipeline,
    }

    async fn fixture(parsers: ParserRegistry) -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let store = Arc::new(FsKnowledgeBaseStore::open(root.path()).await.unwrap());
        let embedder = Arc::new(MockEmbeddingProvider::new(64).with_model("all-minilm"));

        let ingestion = IngestionPipeline::new(
            store.clone(),
            embedder.clone(),
            parsers,
            IngestionConfig::default(),
        )
        .unwrap();
        let retrieval = RetrievalPipeline::new(store.clone(), embedder.clone(), RetrievalConfig::default());

        Fixture {
            _root: root,
            files: tempfile::tempdir().unwrap(),
            store,
            embedder,
            ingestion,
            retrieval,
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn three_page_notes() -> String {
        [
            "Kickoff notes. The team agreed on weekly status meetings every Tuesday morning. \
             Design reviews happen in the shared workspace and everyone attends.",
            "Planning notes. The deadline for the final report is the fifteenth of June. \
             Drafts must be circulated one week before the deadline for review.",
            "Budget notes. Travel expenses are capped and need approval from finance. \
             Hardware purchases go through the procurement portal.",
        ]
        .iter()
        .map(|page| format!("{}\n\n", page.repeat(4)))
        .collect()
    }

    #[tokio::test]
    async fn test_end_to_end_plain_text() {
        let fx = fixture(ParserRegistry::with_defaults()).await;
        let path = write(fx.files.path(), "notes.txt", &three_page_notes());

        fx.ingestion.ingest_file(&path).await.unwrap();
        let names: Vec<String> = fx
            .store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, vec!["notes.txt"]);

        let grounded = fx
            .retrieval
            .retrieve("notes.txt", SourceType::Txt, "what is the deadline")
            .await
            .unwrap();

        assert!(grounded.prompt.contains("what is the deadline"));
        assert!(grounded.prompt.contains("answer only from the following context"));
        assert!(grounded.prompt.contains("The deadline for the final report"));
        assert_eq!(grounded.sources, "");

        let err = fx.ingestion.ingest_file(&path).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(fx.store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_exact_chunk_text_ranks_first() {
        let fx = fixture(ParserRegistry::with_defaults()).await;
        let path = write(fx.files.path(), "notes.txt", &three_page_notes());
        fx.ingestion.ingest_file(&path).await.unwrap();

        let index = fx
            .store
            .load(&KnowledgeBaseName::new("notes.txt").unwrap())
            .await
            .unwrap();

        for chunk in index.chunks() {
            let (_, result) = fx.retrieval.search("notes.txt", &chunk.content).await.unwrap();
            let best = &result.hits[0];
            assert!((best.score - 1.0).abs() < 1e-5);
            assert!(result.hits.iter().all(|h| h.score <= best.score));
            assert!(result.hits.iter().any(|h| h.chunk == *chunk));
        }
    }

    #[tokio::test]
    async fn test_paginated_citations() {
        let parser = MockDocumentParser::new(SourceType::Pdf).with_documents(vec![
            Document::new("Welcome to the quarterly report. Revenue grew steadily.")
                .with_metadata(DocumentMetadata::new().with_page_number(1).with_lines(1, 3)),
            Document::new("The submission deadline is the fifteenth of June.")
                .with_metadata(DocumentMetadata::new().with_page_number(7).with_lines(12, 14)),
        ]);
        let fx = fixture(ParserRegistry::with_defaults().with_parser(Arc::new(parser))).await;
        fx.ingestion
            .ingest_file(Path::new("/docs/report.pdf"))
            .await
            .unwrap();

        let grounded = fx
            .retrieval
            .retrieve("report.pdf", SourceType::Pdf, "submission deadline")
            .await
            .unwrap();

        let first_line = grounded.sources.lines().next().unwrap();
        assert_eq!(first_line, "Page number: 7, From Line 12 to 14");
        assert!(grounded.sources.contains("Page number: 1, From Line 1 to 3"));

        let plain = fx
            .retrieval
            .retrieve("report.pdf", SourceType::Txt, "submission deadline")
            .await
            .unwrap();
        assert_eq!(plain.sources, "");

        let recorded = fx
            .retrieval
            .retrieve_with_recorded_type("report.pdf", "submission deadline")
            .await
            .unwrap();
        assert_eq!(recorded, grounded);
    }

    #[tokio::test]
    async fn test_unknown_knowledge_base() {
        let fx = fixture(ParserRegistry::with_defaults()).await;

        for name in ["missing.txt", "", "../etc", ".staging"] {
            let err = fx
                .retrieval
                .retrieve(name, SourceType::Txt, "query")
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::NotFound { .. }), "{name}");
        }
        assert_eq!(fx.embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let fx = fixture(ParserRegistry::with_defaults()).await;
        let err = fx
            .retrieval
            .retrieve("notes.txt", SourceType::Txt, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_model_mismatch_is_corrupt_index() {
        let fx = fixture(ParserRegistry::with_defaults()).await;
        let path = write(fx.files.path(), "notes.txt", "some notes");
        fx.ingestion.ingest_file(&path).await.unwrap();

        let other_model = RetrievalPipeline::new(
            fx.store.clone(),
            Arc::new(MockEmbeddingProvider::new(64).with_model("nomic-embed-text")),
            RetrievalConfig::default(),
        );
        let err = other_model
            .retrieve("notes.txt", SourceType::Txt, "notes")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CorruptIndex { .. }));

        let other_dimensions = RetrievalPipeline::new(
            fx.store.clone(),
            Arc::new(MockEmbeddingProvider::new(32).with_model("all-minilm")),
            RetrievalConfig::default(),
        );
        let err = other_dimensions
            .retrieve("notes.txt", SourceType::Txt, "notes")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CorruptIndex { .. }));
    }

    #[tokio::test]
    async fn test_embedding_failure_surfaces() {
        let fx = fixture(ParserRegistry::with_defaults()).await;
        let path = write(fx.files.path(), "notes.txt", "some notes");
        fx.ingestion.ingest_file(&path).await.unwrap();

        let failing = RetrievalPipeline::new(
            fx.store.clone(),
            Arc::new(
                MockEmbeddingProvider::new(64)
                    .with_model("all-minilm")
                    .with_error("connection refused"),
            ),
            RetrievalConfig::default(),
        );
        let err = failing
            .retrieve("notes.txt", SourceType::Txt, "notes")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmbeddingService { .. }));
    }

    #[tokio::test]
    async fn test_top_k_limits_hits() {
        let fx = fixture(ParserRegistry::with_defaults()).await;
        let path = write(fx.files.path(), "long.txt", &three_page_notes().repeat(3));
        fx.ingestion.ingest_file(&path).await.unwrap();

        let (index, result) = fx.retrieval.search("long.txt", "deadline").await.unwrap();
        assert!(index.len() > 4);
        assert_eq!(result.hits.len(), 4);
    }
}
