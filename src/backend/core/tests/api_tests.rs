//! HTTP and GraphQL tests.
//!
//! Tests cover:
//! - REST health routes and the platform manifest through the router
//! - GraphQL over HTTP with and without bearer tokens
//! - Direct schema execution with error codes in extensions

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use launchpad_core::api::{build_router, AppState};
use launchpad_core::aspects::{self, Services};
use launchpad_core::config::AuthSettings;
use launchpad_core::graphql::build_schema;
use launchpad_core::middleware::{AuthConfig, Authenticator, Claims};
use launchpad_core::rbac::Actor;

struct TestApp {
    router: Router,
    authenticator: Arc<Authenticator>,
}

impl TestApp {
    async fn new() -> Self {
        let services = Services::in_memory();
        let platform = Arc::new(aspects::compose(&services).unwrap());
        platform.seed(&services).await.unwrap();

        let authenticator =
            Arc::new(Authenticator::new(AuthConfig::from_settings(&AuthSettings::default())).unwrap());
        let router = build_router(AppState::new(services, platform), authenticator.clone());
        Self { router, authenticator }
    }

    fn token(&self, user_id: &str, roles: &[&str]) -> String {
        let claims = Claims::builder(user_id)
            .roles(roles.iter().map(|r| r.to_string()).collect())
            .build();
        self.authenticator.generate_token(&claims).unwrap()
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn graphql(&self, token: Option<&str>, query: &str, variables: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = json!({ "query": query, "variables": variables }).to_string();
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"].as_str().unwrap_or_default()
}

// ============================================================================
// REST
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["aspects"], 6);
}

#[tokio::test]
async fn test_manifest_lists_aspects() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/v1/platform/manifest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["aspects"].as_array().unwrap().len(), 6);
    assert_eq!(body["data"]["profileTabs"][0]["key"], "about");
}

#[tokio::test]
async fn test_rest_search() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/search?q=radar&types=product").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["contentType"], "product");

    let (status, body) = app.get("/api/v1/search?q=radar&types=gadget").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNKNOWN_SEARCH_TYPE");
}

// ============================================================================
// GraphQL over HTTP
// ============================================================================

#[tokio::test]
async fn test_anonymous_reads_but_cannot_write() {
    let app = TestApp::new().await;

    let (status, body) = app
        .graphql(None, "{ listForums { id title topicCount } }", json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["data"]["listForums"].as_array().unwrap().is_empty());

    let (_, body) = app
        .graphql(
            None,
            "mutation($input: CreateForumInput!) { createForum(input: $input) { id } }",
            json!({ "input": { "title": "Off topic", "description": "Anything" } }),
        )
        .await;
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_bad_token_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app.graphql(Some("not-a-token"), "{ me { id } }", json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_creates_and_upvotes() {
    let app = TestApp::new().await;
    let token = app.token("u-http", &["member"]);

    let (_, body) = app
        .graphql(
            Some(&token),
            "mutation($input: CreateProductInput!) { createProduct(input: $input) { id status ownerId } }",
            json!({ "input": {
                "name": "Pager",
                "tagline": "Quiet alerts",
                "description": "On-call without the noise",
                "websiteUrl": "https://pager.example.com"
            }}),
        )
        .await;
    let product = &body["data"]["createProduct"];
    assert_eq!(product["status"], "PENDING");
    assert_eq!(product["ownerId"], "u-http");
    let id = product["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let (_, body) = app
            .graphql(
                Some(&token),
                "mutation($id: ID!) { upvote(productId: $id) { id } }",
                json!({ "id": id }),
            )
            .await;
        assert!(body["errors"].is_null());
    }

    let (_, body) = app
        .graphql(
            Some(&token),
            "query($id: ID!) { getProduct(id: $id) { upvoteCount viewerHasUpvoted } }",
            json!({ "id": id }),
        )
        .await;
    assert_eq!(body["data"]["getProduct"]["upvoteCount"], 1);
    assert_eq!(body["data"]["getProduct"]["viewerHasUpvoted"], true);
}

// ============================================================================
// Direct Schema Execution
// ============================================================================

#[tokio::test]
async fn test_schema_reports_error_codes() {
    let services = Services::in_memory();
    let platform = Arc::new(aspects::compose(&services).unwrap());
    let schema = build_schema(services, platform);

    let response = schema
        .execute(async_graphql::Request::new(r#"{ getForum(id: "missing") { id } }"#))
        .await;
    assert_eq!(response.errors.len(), 1);
    let extensions = response.errors[0].extensions.as_ref().unwrap();
    assert_eq!(
        extensions.get("code"),
        Some(&async_graphql::Value::from("NOT_FOUND"))
    );

    let response = schema
        .execute(
            async_graphql::Request::new(
                r#"mutation { createForum(input: { title: "", description: "Empty title" }) { id } }"#,
            )
            .data(Actor::member("u1")),
        )
        .await;
    let extensions = response.errors[0].extensions.as_ref().unwrap();
    assert_eq!(
        extensions.get("code"),
        Some(&async_graphql::Value::from("VALIDATION_ERROR"))
    );
}

#[tokio::test]
async fn test_schema_resolves_nested_relations() {
    let services = Services::in_memory();
    let platform = Arc::new(aspects::compose(&services).unwrap());
    platform.seed(&services).await.unwrap();
    let schema = build_schema(services, platform);

    let response = schema
        .execute(
            r#"{
                listLaunches(filter: { status: LIVE }) {
                    title
                    product { name ratingSummary { count average } }
                }
            }"#,
        )
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let launches = data["listLaunches"].as_array().unwrap();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0]["product"]["name"], "Crate Radar");
    assert_eq!(launches[0]["product"]["ratingSummary"]["count"], 1);
}
