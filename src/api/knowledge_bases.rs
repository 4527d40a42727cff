//! Knowledge base endpoints

use axum::extract::{Path, Query, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CompleteQuery, CompleteResponse, IngestResponse, Json, ListKnowledgeBasesResponse,
    RetrieveRequest,
};
use crate::domain::ingestion::FileSelection;
use crate::domain::knowledge_base::{GroundedPrompt, SourceType};

/// GET /knowledge-bases
pub async fn list_knowledge_bases(
    State(state): State<AppState>,
) -> Result<Json<ListKnowledgeBasesResponse>, ApiError> {
    let names = state.store.list().await?;

    Ok(Json(ListKnowledgeBasesResponse::from(
        names.into_iter().map(String::from).collect::<Vec<_>>(),
    )))
}

/// GET /knowledge-bases/complete?input=/no
pub async fn complete_knowledge_base(
    State(state): State<AppState>,
    Query(query): Query<CompleteQuery>,
) -> Result<Json<CompleteResponse>, ApiError> {
    debug!(input = %query.input, "Completing knowledge base name");

    let matches = state.store.complete(&query.input).await?;

    Ok(Json(CompleteResponse {
        matches: matches.into_iter().map(String::from).collect(),
    }))
}

/// POST /knowledge-bases
/// Ingest the files of a selection, one knowledge base per file
pub async fn ingest_knowledge_bases(
    State(state): State<AppState>,
    Json(selection): Json<FileSelection>,
) -> Result<Json<IngestResponse>, ApiError> {
    debug!(
        canceled = selection.canceled,
        files = selection.file_paths.len(),
        "Ingesting file selection"
    );

    let outcome = state.ingestion.ingest_selection(selection).await;

    Ok(Json(IngestResponse::from(outcome)))
}

/// POST /knowledge-bases/{name}/retrieve
pub async fn retrieve(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<RetrieveRequest>,
) -> Result<Json<GroundedPrompt>, ApiError> {
    debug!(name = %name, "Retrieving context");

    let grounded = match request.source_type.as_deref() {
        Some(source_type) => {
            let source_type: SourceType = source_type.parse()?;
            state
                .retrieval
                .retrieve(&name, source_type, &request.query)
                .await?
        }
        None => {
            state
                .retrieval
                .retrieve_with_recorded_type(&name, &request.query)
                .await?
        }
    };

    Ok(Json(grounded))
}
