//! Authentication middleware.
//!
//! Features:
//! - HS256 JWT validation with issuer, audience and leeway checks
//! - Public paths that skip authentication entirely
//! - Optional paths that admit anonymous callers but reject bad tokens
//! - Request context injection for handlers and GraphQL resolvers
//!
//! # Example
//!
//! ```rust,ignore
//! use launchpad_core::middleware::auth::{AuthConfig, AuthLayer};
//!
//! let config = AuthConfig::builder()
//!     .jwt_secret("your-secret-key")
//!     .add_optional_path("/graphql")
//!     .build();
//!
//! let app = Router::new()
//!     .route("/graphql", post(graphql_handler))
//!     .layer(AuthLayer::from_config(config)?);
//! ```

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use futures::future::BoxFuture;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use thiserror::Error;
use tower::{Layer, Service};
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthSettings;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication credentials")]
    MissingCredentials,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication credentials are required",
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "The provided token is invalid",
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "The authentication token has expired",
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An authentication error occurred",
            ),
        };

        counter!("launchpad_auth_errors_total", "error_type" => code).increment(1);

        let body = serde_json::json!({
            "success": false,
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JWT Claims
// ═══════════════════════════════════════════════════════════════════════════════

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Display name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Role names
    #[serde(default)]
    pub roles: Vec<String>,

    /// Token ID
    #[serde(default = "generate_jti")]
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

fn generate_jti() -> String {
    Uuid::new_v4().to_string()
}

impl Claims {
    /// Create claims with builder pattern.
    pub fn builder(user_id: impl Into<String>) -> ClaimsBuilder {
        ClaimsBuilder::new(user_id)
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Get the expiration time.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Builder for JWT claims.
pub struct ClaimsBuilder {
    claims: Claims,
}

impl ClaimsBuilder {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            claims: Claims {
                sub: user_id.into(),
                name: None,
                roles: Vec::new(),
                jti: generate_jti(),
                iat: now.timestamp(),
                exp: (now + Duration::hours(1)).timestamp(),
                iss: None,
                aud: None,
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.claims.name = Some(name.into());
        self
    }

    pub fn roles(mut self, roles: Vec<String>) -> Self {
        self.claims.roles = roles;
        self
    }

    pub fn add_role(mut self, role: impl Into<String>) -> Self {
        self.claims.roles.push(role.into());
        self
    }

    pub fn expires_in(mut self, duration: Duration) -> Self {
        self.claims.exp = (Utc::now() + duration).timestamp();
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.claims.iss = Some(issuer.into());
        self
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.claims.aud = Some(audience.into());
        self
    }

    pub fn build(self) -> Claims {
        self.claims
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════════

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Enable authentication
    pub enabled: bool,

    /// HMAC secret
    pub jwt_secret: Option<String>,

    /// Token issuer for validation
    pub issuer: Option<String>,

    /// Token audience for validation
    pub audience: Option<String>,

    /// Leeway for expiration checks (in seconds)
    pub leeway_secs: u64,

    /// Paths that never look at credentials
    pub public_paths: Vec<String>,

    /// Paths that admit anonymous callers; presented tokens must still be valid
    pub optional_paths: Vec<String>,

    /// Header name for JWT
    pub jwt_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jwt_secret: None,
            issuer: None,
            audience: None,
            leeway_secs: 60,
            public_paths: vec![
                "/health".to_string(),
                "/metrics".to_string(),
                "/api/v1/platform/*".to_string(),
            ],
            optional_paths: Vec::new(),
            jwt_header: "Authorization".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create a new builder.
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Configuration derived from application settings.
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::builder()
            .jwt_secret(settings.jwt_secret.clone())
            .issuer(settings.jwt_issuer.clone())
            .audience(settings.jwt_audience.clone())
            .add_optional_path("/graphql")
            .add_optional_path("/api/v1/search")
            .build()
    }
}

/// Builder for auth configuration.
#[derive(Default)]
pub struct AuthConfigBuilder {
    config: AuthConfig,
}

impl AuthConfigBuilder {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = Some(secret.into());
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.config.issuer = Some(issuer.into());
        self
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.config.audience = Some(audience.into());
        self
    }

    pub fn leeway_secs(mut self, secs: u64) -> Self {
        self.config.leeway_secs = secs;
        self
    }

    pub fn add_public_path(mut self, path: impl Into<String>) -> Self {
        self.config.public_paths.push(path.into());
        self
    }

    pub fn add_optional_path(mut self, path: impl Into<String>) -> Self {
        self.config.optional_paths.push(path.into());
        self
    }

    pub fn build(self) -> AuthConfig {
        self.config
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Authentication Context
// ═══════════════════════════════════════════════════════════════════════════════

/// Authentication context attached to requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID
    pub user_id: String,

    /// Display name
    pub name: Option<String>,

    /// Role names
    pub roles: Vec<String>,

    /// Authentication method used
    pub auth_method: AuthMethod,

    /// Token expiration
    pub expires_at: Option<DateTime<Utc>>,

    /// Request ID for correlation
    pub request_id: String,
}

/// Authentication method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    Jwt,
    Anonymous,
}

impl AuthContext {
    /// Create from JWT claims.
    pub fn from_claims(claims: Claims, request_id: String) -> Self {
        let expires_at = claims.expires_at();
        Self {
            user_id: claims.sub,
            name: claims.name,
            roles: claims.roles,
            auth_method: AuthMethod::Jwt,
            expires_at: Some(expires_at),
            request_id,
        }
    }

    /// Create anonymous context.
    pub fn anonymous(request_id: String) -> Self {
        Self {
            user_id: "anonymous".to_string(),
            name: None,
            roles: Vec::new(),
            auth_method: AuthMethod::Anonymous,
            expires_at: None,
            request_id,
        }
    }

    /// Check if this is an authenticated context.
    pub fn is_authenticated(&self) -> bool {
        self.auth_method != AuthMethod::Anonymous
    }
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("X-Request-ID")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn path_matches(patterns: &[String], path: &str) -> bool {
    patterns.iter().any(|p| match p.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => path == p,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Authenticator
// ═══════════════════════════════════════════════════════════════════════════════

/// Validates and issues tokens.
pub struct Authenticator {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Authenticator {
    /// Create a new authenticator.
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let secret = config
            .jwt_secret
            .as_ref()
            .ok_or_else(|| AuthError::Internal("JWT secret required for HS256".into()))?;

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;

        if let Some(ref issuer) = config.issuer {
            validation.set_issuer(&[issuer]);
        }

        if let Some(ref audience) = config.audience {
            validation.set_audience(&[audience]);
        }

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Check if a path is public (doesn't look at credentials).
    pub fn is_public_path(&self, path: &str) -> bool {
        path_matches(&self.config.public_paths, path)
    }

    /// Check if a path admits anonymous callers.
    pub fn is_optional_path(&self, path: &str) -> bool {
        path_matches(&self.config.optional_paths, path)
    }

    /// Authenticate a request from its headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let request_id = request_id(headers);

        match self.extract_jwt(headers) {
            Some(token) => self.validate_jwt(&token, request_id),
            None => Err(AuthError::MissingCredentials),
        }
    }

    fn extract_jwt(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(&self.config.jwt_header)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| {
                s.strip_prefix("Bearer ")
                    .or_else(|| s.strip_prefix("bearer "))
                    .map(|s| s.to_string())
            })
    }

    fn validate_jwt(&self, token: &str, request_id: String) -> Result<AuthContext, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("JWT validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;

        counter!("launchpad_auth_success_total", "method" => "jwt").increment(1);

        Ok(AuthContext::from_claims(token_data.claims, request_id))
    }

    /// Sign claims into a token, filling issuer and audience from configuration.
    pub fn generate_token(&self, claims: &Claims) -> Result<String, AuthError> {
        let mut claims = claims.clone();
        if claims.iss.is_none() {
            claims.iss = self.config.issuer.clone();
        }
        if claims.aud.is_none() {
            claims.aud = self.config.audience.clone();
        }

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate token: {}", e)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Layer and Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Authentication layer for Tower.
#[derive(Clone)]
pub struct AuthLayer {
    authenticator: Arc<Authenticator>,
}

impl AuthLayer {
    /// Create a new auth layer.
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Create from configuration.
    pub fn from_config(config: AuthConfig) -> Result<Self, AuthError> {
        let authenticator = Authenticator::new(config)?;
        Ok(Self::new(Arc::new(authenticator)))
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            authenticator: self.authenticator.clone(),
        }
    }
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    authenticator: Arc<Authenticator>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let path = request.uri().path().to_string();

            if !authenticator.config.enabled || authenticator.is_public_path(&path) {
                let context = AuthContext::anonymous(request_id(request.headers()));
                request.extensions_mut().insert(context);
                return inner.call(request).await;
            }

            match authenticator.authenticate(request.headers()) {
                Ok(auth_context) => {
                    request.extensions_mut().insert(auth_context);
                    inner.call(request).await
                }
                Err(AuthError::MissingCredentials) if authenticator.is_optional_path(&path) => {
                    let context = AuthContext::anonymous(request_id(request.headers()));
                    request.extensions_mut().insert(context);
                    inner.call(request).await
                }
                Err(e) => Ok(e.into_response()),
            }
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Axum Extractor
// ═══════════════════════════════════════════════════════════════════════════════

/// Extractor for authentication context in handlers.
///
/// Routes outside the auth layer see an anonymous context.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_else(|| AuthContext::anonymous(request_id(&parts.headers))))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn authenticator() -> Authenticator {
        let config = AuthConfig::builder()
            .jwt_secret("super-secret-key-for-testing-only")
            .issuer("launchpad")
            .audience("launchpad-api")
            .add_optional_path("/graphql")
            .build();
        Authenticator::new(config).unwrap()
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_claims_builder() {
        let claims = Claims::builder("user123")
            .name("Ada")
            .roles(vec!["member".to_string()])
            .add_role("moderator")
            .expires_in(Duration::hours(24))
            .build();

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.roles, vec!["member", "moderator"]);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_token_round_trip() {
        let auth = authenticator();
        let claims = Claims::builder("user-1").add_role("admin").build();
        let token = auth.generate_token(&claims).unwrap();

        let ctx = auth.authenticate(&bearer(&token)).unwrap();
        assert_eq!(ctx.user_id, "user-1");
        assert_eq!(ctx.roles, vec!["admin"]);
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.auth_method, AuthMethod::Jwt);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = authenticator();
        let claims = Claims::builder("user-1")
            .expires_in(Duration::hours(-2))
            .build();
        let token = auth.generate_token(&claims).unwrap();

        assert!(matches!(
            auth.authenticate(&bearer(&token)),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth = authenticator();
        assert!(matches!(
            auth.authenticate(&bearer("not-a-jwt")),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            auth.authenticate(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_path_classes() {
        let auth = authenticator();

        assert!(auth.is_public_path("/health"));
        assert!(auth.is_public_path("/api/v1/platform/manifest"));
        assert!(!auth.is_public_path("/graphql"));
        assert!(auth.is_optional_path("/graphql"));
    }
}
