//! Plain text document parser

use std::path::Path;

use async_trait::async_trait;

use crate::domain::ingestion::{Document, DocumentParser};
use crate::domain::knowledge_base::SourceType;
use crate::domain::DomainError;

/// Parser for plain text files
///
/// Produces a single document with empty metadata: plain text has no pages to cite.
#[derive(Debug, Clone, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    /// Create a new plain text parser
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for PlainTextParser {
    fn source_type(&self) -> SourceType {
        SourceType::Txt
    }

    async fn parse(&self, path: &Path) -> Result<Vec<Document>, DomainError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DomainError::io(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        let content = String::from_utf8(bytes).map_err(|_| {
            DomainError::validation(format!("'{}' is not valid UTF-8 text", path.display()))
        })?;

        Ok(vec![Document::new(content)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::DocumentMetadata;

    #[tokio::test]
    async fn test_parse_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Hello, World!\nSecond line").unwrap();

        let documents = PlainTextParser::new().parse(&path).await.unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].content, "Hello, World!\nSecond line");
        assert_eq!(documents[0].metadata, DocumentMetadata::new());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PlainTextParser::new()
            .parse(&dir.path().join("missing.txt"))
            .await;

        assert!(matches!(result, Err(DomainError::Io { .. })));
    }

    #[tokio::test]
    async fn test_binary_content_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let result = PlainTextParser::new().parse(&path).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
