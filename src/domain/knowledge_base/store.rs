//! Knowledge base store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::KnowledgeBaseName;
use super::index::VectorIndex;
use crate::domain::DomainError;

/// Single source of truth for which knowledge bases exist
///
/// Nothing is cached: every call re-reads the backing storage.
#[async_trait]
pub trait KnowledgeBaseStore: Send + Sync + Debug {
    /// Names of every committed knowledge base, in storage order
    async fn list(&self) -> Result<Vec<KnowledgeBaseName>, DomainError>;

    /// True if `name` cannot be used for a new knowledge base. Defaults to membership
    /// in `list`
    async fn exists(&self, name: &KnowledgeBaseName) -> Result<bool, DomainError> {
        Ok(self.list().await?.contains(name))
    }

    /// Persist `index` under `name`. The entry becomes visible to `list` only once
    /// every part is written; on failure nothing is left behind.
    async fn commit(&self, name: &KnowledgeBaseName, index: &VectorIndex)
        -> Result<(), DomainError>;

    /// Load a committed index
    async fn load(&self, name: &KnowledgeBaseName) -> Result<VectorIndex, DomainError>;

    /// Catalog names matching a `/`-prefixed autocomplete input
    async fn complete(&self, input: &str) -> Result<Vec<KnowledgeBaseName>, DomainError> {
        let Some(typed) = completion_query(input) else {
            return Ok(vec![]);
        };

        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|name| name.as_str().contains(typed))
            .collect())
    }
}

/// The text typed after the leading `/`, or `None` when the input is not a
/// knowledge base reference
pub fn completion_query(input: &str) -> Option<&str> {
    input.trim().strip_prefix('/')
}
