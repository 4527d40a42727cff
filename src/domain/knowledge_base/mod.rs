//! Knowledge base domain - identity, vector index and retrieval

mod citation;
mod entity;
mod index;
mod retrieval;
mod store;

pub use citation::CitationStyle;
pub use entity::{KnowledgeBaseName, SourceType};
pub use index::{IndexManifest, ScoredChunk, VectorIndex, INDEX_FORMAT_VERSION};
pub use retrieval::{GroundedPrompt, RetrievalResult};
pub use store::{completion_query, KnowledgeBaseStore};

#[cfg(test)]
pub use store::mock::InMemoryKnowledgeBaseStore;
