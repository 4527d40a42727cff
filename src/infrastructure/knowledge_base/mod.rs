//! Knowledge base store and retrieval implementations

mod fs_store;
mod retrieval;

pub use fs_store::{FsKnowledgeBaseStore, STAGING_DIR};
pub use retrieval::{RetrievalConfig, RetrievalPipeline};
