//! Infrastructure layer - External service implementations

pub mod embedding;
pub mod http_client;
pub mod ingestion;
pub mod knowledge_base;
pub mod logging;
