use crate::api::{handlers, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the gateway router. The routes mirror the queue operations
/// one to one.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/_index", post(handlers::index_launches))
        .route("/_analyze", post(handlers::analyze_logs))
        .route("/_index/delete", put(handlers::clean_index))
        .route("/_index/:id", delete(handlers::delete_index))
        .route("/_search_logs", post(handlers::search_logs))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
