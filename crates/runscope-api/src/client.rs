//! HTTP transport for the Runscope REST API.
//!
//! - Base URL: `https://api.runscope.com` unless overridden
//! - Auth: `Authorization: Bearer {access_token}` on every request
//! - Request/Response: JSON, responses wrapped in [`Envelope`]
//!
//! `Content-Type: application/json` is only sent when the request has a body.
//! No retries; every status >= 400 becomes a [`RunscopeError`].

use crate::error::{RunscopeError, RunscopeResult};
use crate::schema::Envelope;
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Production API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.runscope.com";

/// Runscope API client.
#[derive(Debug, Clone)]
pub struct RunscopeClient {
    http: Client,
    base_url: String,
    token: String,
}

impl RunscopeClient {
    /// Create a client for `endpoint` authenticating with `token`.
    pub fn new(token: &str, endpoint: &str) -> RunscopeResult<Self> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| {
            RunscopeError::invalid_config(format!("Invalid API URL '{}': {}", endpoint, e))
        })?;

        let http = Client::builder()
            .user_agent(concat!("terraform-provider-runscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                RunscopeError::invalid_config(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Request building ────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create an authenticated request builder.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        self.http
            .request(method, &url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
    }

    // ── Response handling ───────────────────────────────────────────

    /// Send a request and return the raw response if the status is below 400.
    async fn send(&self, builder: RequestBuilder) -> RunscopeResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.as_u16() >= 400 {
            let reason = status.canonical_reason().unwrap_or("").to_string();
            let text = response.text().await.unwrap_or_default();
            return Err(RunscopeError::from_api_response(
                status.as_u16(),
                &reason,
                &text,
            ));
        }
        Ok(response)
    }

    /// Execute a request and unwrap the envelope's `data`.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> RunscopeResult<T> {
        let response = self.send(builder).await?;
        let url = response.url().to_string();
        let text = response
            .text()
            .await
            .map_err(|e| RunscopeError::network(format!("Failed to read response body: {}", e)))?;
        let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
            RunscopeError::parse(format!(
                "Failed to parse response JSON: {} (url: {})",
                e, url
            ))
        })?;
        Ok(envelope.data)
    }

    // ── Convenience HTTP methods ────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> RunscopeResult<T> {
        self.execute(self.request(Method::GET, path)).await
    }

    /// POST with only query parameters and no body.
    pub async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> RunscopeResult<T> {
        self.execute(self.request(Method::POST, path).query(query))
            .await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> RunscopeResult<T> {
        self.execute(self.request(Method::POST, path).json(body))
            .await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> RunscopeResult<T> {
        self.execute(self.request(Method::PUT, path).json(body))
            .await
    }

    /// DELETE, discarding whatever body comes back.
    pub async fn delete(&self, path: &str) -> RunscopeResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
