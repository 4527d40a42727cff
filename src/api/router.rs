use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::health;
use super::knowledge_bases;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route(
            "/knowledge-bases",
            get(knowledge_bases::list_knowledge_bases)
                .post(knowledge_bases::ingest_knowledge_bases),
        )
        .route(
            "/knowledge-bases/complete",
            get(knowledge_bases::complete_knowledge_base),
        )
        .route(
            "/knowledge-bases/{name}/retrieve",
            post(knowledge_bases::retrieve),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
