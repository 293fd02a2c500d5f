//! HTTP client for the Launchpad API server.

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// REST response wrapper matching the server's `ApiResponse`.
#[derive(Debug, serde::Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub error_code: Option<String>,
}

/// Client for the REST routes and the GraphQL endpoint.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET a REST route and unwrap the `data` of its response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;
        if !status.is_success() {
            let message = body["error"]["message"].as_str().unwrap_or("request failed");
            let code = body["error"]["code"].as_str().unwrap_or("UNKNOWN_ERROR");
            anyhow::bail!("API error ({}): {} [{}]", status, message, code);
        }

        let api_resp: ApiResponse<T> =
            serde_json::from_value(body).context("Unexpected response shape")?;
        if api_resp.success {
            api_resp
                .data
                .ok_or_else(|| anyhow::anyhow!("API returned success but no data"))
        } else {
            Err(anyhow::anyhow!(
                "API error: {} [{}]",
                api_resp.error.unwrap_or_else(|| "Unknown error".into()),
                api_resp.error_code.unwrap_or_default()
            ))
        }
    }

    /// GET a route and return its JSON body as is.
    pub async fn get_raw(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// Run a GraphQL operation and return the field `field` of its data.
    ///
    /// The first GraphQL error, with its `extensions.code`, becomes the error.
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        field: &str,
    ) -> Result<T> {
        let url = format!("{}/graphql", self.base_url);
        let resp = self
            .authorized(self.client.post(&url))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        let mut body: Value = resp
            .json()
            .await
            .context("Failed to parse GraphQL response")?;

        if let Some(error) = body["errors"].as_array().and_then(|e| e.first()) {
            anyhow::bail!(
                "{} [{}]",
                error["message"].as_str().unwrap_or("GraphQL error"),
                error["extensions"]["code"].as_str().unwrap_or("UNKNOWN_ERROR")
            );
        }

        let data = body["data"][field].take();
        serde_json::from_value(data).with_context(|| format!("Unexpected shape for '{}'", field))
    }
}
