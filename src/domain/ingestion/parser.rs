//! Document parser trait

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use super::document::Document;
use crate::domain::knowledge_base::SourceType;
use crate::domain::DomainError;

/// Turns a file on disk into page-tagged documents
///
/// Parsers for paginated formats are expected to fill `page_number` and `lines` on
/// every document they return.
#[async_trait]
pub trait DocumentParser: Send + Sync + Debug {
    /// Source type this parser handles
    fn source_type(&self) -> SourceType;

    /// Parse the file at `path`
    async fn parse(&self, path: &Path) -> Result<Vec<Document>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Parser returning canned documents regardless of the path
    #[derive(Debug)]
    pub struct MockDocumentParser {
        source_type: SourceType,
        result: Mutex<Option<Result<Vec<Document>, String>>>,
    }

    impl MockDocumentParser {
        pub fn new(source_type: SourceType) -> Self {
            Self {
                source_type,
                result: Mutex::new(None),
            }
        }

        pub fn with_documents(self, documents: Vec<Document>) -> Self {
            *self.result.lock().unwrap() = Some(Ok(documents));
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.result.lock().unwrap() = Some(Err(error.into()));
            self
        }
    }

    #[async_trait]
    impl DocumentParser for MockDocumentParser {
        fn source_type(&self) -> SourceType {
            self.source_type
        }

        async fn parse(&self, _path: &Path) -> Result<Vec<Document>, DomainError> {
            match self.result.lock().unwrap().clone() {
                Some(Ok(documents)) => Ok(documents),
                Some(Err(error)) => Err(DomainError::validation(error)),
                None => Ok(vec![]),
            }
        }
    }
}
