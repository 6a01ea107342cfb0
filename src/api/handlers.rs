use crate::api::AppState;
use crate::error::Result;
use crate::models::{AnalysisResult, CleanIndex, Launch, SearchLogs};
use crate::search::response::{BulkResponse, Response as BackendResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

/// Health endpoint backed by the backend cluster health.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    if state.client.healthy().await {
        (StatusCode::OK, Json(json!({"status": "healthy"})))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "unavailable"})),
        )
    }
}

pub async fn index_launches(
    State(state): State<AppState>,
    Json(launches): Json<Vec<Launch>>,
) -> Result<Json<BulkResponse>> {
    Ok(Json(state.handler.index_launches(launches).await?))
}

pub async fn analyze_logs(
    State(state): State<AppState>,
    Json(launches): Json<Vec<Launch>>,
) -> Result<Json<Vec<AnalysisResult>>> {
    Ok(Json(state.handler.analyze_logs(launches).await?))
}

pub async fn delete_index(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BackendResponse>> {
    Ok(Json(state.handler.delete_index(id).await?))
}

pub async fn clean_index(
    State(state): State<AppState>,
    Json(ci): Json<CleanIndex>,
) -> Result<Json<BackendResponse>> {
    Ok(Json(state.handler.clean_index(ci).await?))
}

pub async fn search_logs(
    State(state): State<AppState>,
    Json(request): Json<SearchLogs>,
) -> Result<Json<Vec<i64>>> {
    Ok(Json(state.handler.search_logs(request).await?))
}
