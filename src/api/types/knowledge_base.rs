//! Knowledge base endpoint payloads

use serde::{Deserialize, Serialize};

use crate::domain::ingestion::{IngestionFailure, IngestionOutcome, IngestionResult};

/// GET /knowledge-bases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListKnowledgeBasesResponse {
    pub knowledge_bases: Vec<String>,
    pub total: usize,
}

impl From<Vec<String>> for ListKnowledgeBasesResponse {
    fn from(knowledge_bases: Vec<String>) -> Self {
        let total = knowledge_bases.len();
        Self {
            knowledge_bases,
            total,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteQuery {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResponse {
    pub matches: Vec<String>,
}

/// POST /knowledge-bases
///
/// A canceled selection answers `{"aborted": true}` with empty result lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub aborted: bool,
    pub succeeded: Vec<IngestionResult>,
    pub failed: Vec<IngestionFailure>,
    pub total_chunks: usize,
}

impl From<IngestionOutcome> for IngestResponse {
    fn from(outcome: IngestionOutcome) -> Self {
        match outcome {
            IngestionOutcome::Aborted => Self {
                aborted: true,
                succeeded: vec![],
                failed: vec![],
                total_chunks: 0,
            },
            IngestionOutcome::Completed(batch) => Self {
                aborted: false,
                total_chunks: batch.total_chunks(),
                succeeded: batch.succeeded,
                failed: batch.failed,
            },
        }
    }
}

/// POST /knowledge-bases/{name}/retrieve
///
/// Without `source_type` citations follow the type recorded at ingestion.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveRequest {
    #[serde(default, alias = "sourceType")]
    pub source_type: Option<String>,
    pub query: String,
}
