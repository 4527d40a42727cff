//! Request, response and error types shared by the HTTP handlers

pub mod error;
pub mod json;
pub mod knowledge_base;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use knowledge_base::{
    CompleteQuery, CompleteResponse, IngestResponse, ListKnowledgeBasesResponse, RetrieveRequest,
};
