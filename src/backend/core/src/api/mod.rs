//! HTTP surface: the GraphQL endpoint plus a few REST routes for health checks,
//! metrics and the platform manifest.

mod graphql;
mod handlers;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::aspects::Services;
use crate::graphql::AppSchema;
use crate::middleware::{AuthLayer, Authenticator};
use crate::platform::Platform;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub platform: Arc<Platform>,
    pub schema: AppSchema,
    /// Serve GraphiQL on `GET /graphql`.
    pub graphiql: bool,
}

impl AppState {
    pub fn new(services: Services, platform: Arc<Platform>) -> Self {
        let schema = crate::graphql::build_schema(services.clone(), platform.clone());
        Self {
            services,
            platform,
            schema,
            graphiql: true,
        }
    }

    pub fn with_graphiql(mut self, enabled: bool) -> Self {
        self.graphiql = enabled;
        self
    }
}

/// Build the API router.
///
/// - `GET /health`, `GET /metrics`
/// - `POST /graphql` (and `GET /graphql` for GraphiQL when enabled)
/// - `GET /api/v1/platform/manifest`, `GET /api/v1/platform/search-types`
/// - `GET /api/v1/search`
pub fn build_router(state: AppState, authenticator: Arc<Authenticator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let graphql_route = if state.graphiql {
        get(graphql::graphiql).post(graphql::graphql_handler)
    } else {
        axum::routing::post(graphql::graphql_handler)
    };

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::prometheus_metrics))
        .route("/graphql", graphql_route)
        .route("/api/v1/platform/manifest", get(handlers::platform_manifest))
        .route("/api/v1/platform/search-types", get(handlers::search_types))
        .route("/api/v1/search", get(handlers::search))
        .layer(AuthLayer::new(authenticator))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// API response wrapper.
#[derive(serde::Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
        }
    }

    pub fn from_error(err: &crate::error::LaunchpadError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.user_message().to_string()),
            error_code: Some(err.code().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchpadError;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert_eq!(response.data, Some("test data"));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_api_response_error() {
        let response: ApiResponse<()> =
            ApiResponse::from_error(&LaunchpadError::not_found("Product", "p1"));
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error_code.as_deref(), Some("NOT_FOUND"));
    }
}
