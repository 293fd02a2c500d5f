//! REST handlers.
//!
//! Handlers return `Result<impl IntoResponse, LaunchpadError>` so errors map
//! to HTTP status codes through `LaunchpadError`'s `IntoResponse`.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::{ApiResponse, AppState};
use crate::error::LaunchpadError;

// ═══════════════════════════════════════════════════════════════════════════════
// Health Check
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "aspects": state.platform.shell().aspects().len(),
        "indexed": state.services.search.indexed_count(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn prometheus_metrics() -> impl IntoResponse {
    let body = crate::observability::metrics::MetricsRegistry::global().render();

    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Platform
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn platform_manifest(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.platform.manifest()))
}

pub async fn search_types(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.services.search.search_types()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Search
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    /// Comma separated search types.
    pub types: Option<String>,
    pub limit: Option<i32>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, LaunchpadError> {
    let types = params.types.map(|t| {
        t.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
    });

    let hits = state.services.search.search(&params.q, types, params.limit).await?;
    Ok(Json(ApiResponse::success(hits)))
}
