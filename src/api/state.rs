//! Application state for shared services

use std::sync::Arc;

use crate::domain::knowledge_base::KnowledgeBaseStore;
use crate::infrastructure::ingestion::IngestionPipeline;
use crate::infrastructure::knowledge_base::RetrievalPipeline;

/// Services shared by every handler
///
/// The store is the only source of truth for the catalog; nothing here caches names.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KnowledgeBaseStore>,
    pub ingestion: Arc<IngestionPipeline>,
    pub retrieval: Arc<RetrievalPipeline>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KnowledgeBaseStore>,
        ingestion: IngestionPipeline,
        retrieval: RetrievalPipeline,
    ) -> Self {
        Self {
            store,
            ingestion: Arc::new(ingestion),
            retrieval: Arc::new(retrieval),
        }
    }
}
