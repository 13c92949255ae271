//! Provider block configuration.
//!
//! `access_token` and `api_url` come from the provider block, falling back to
//! `RUNSCOPE_ACCESS_TOKEN` and `RUNSCOPE_API_URL`. The token is never logged.

use crate::error::{ProviderError, ProviderResult};
use log::info;
use runscope_api::{RunscopeClient, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ACCESS_TOKEN_ENV: &str = "RUNSCOPE_ACCESS_TOKEN";
pub const API_URL_ENV: &str = "RUNSCOPE_API_URL";

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub api_url: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("access_token", &"***")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(access_token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_url: api_url.into(),
        }
    }

    /// Fill unset fields from the environment, then the default endpoint.
    pub fn with_env_fallback(mut self) -> Self {
        if self.access_token.is_empty() {
            self.access_token = std::env::var(ACCESS_TOKEN_ENV).unwrap_or_default();
        }
        if self.api_url.is_empty() {
            self.api_url =
                std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        }
        self.api_url = self.api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.access_token.trim().is_empty() {
            return Err(format!(
                "access_token is required (set it in the provider block or {})",
                ACCESS_TOKEN_ENV
            ));
        }
        let url = url::Url::parse(&self.api_url)
            .map_err(|e| format!("api_url '{}' is not a valid URL: {}", self.api_url, e))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(format!("api_url must use http or https, got '{}'", other)),
        }
    }

    /// Validated client for this configuration.
    pub fn client(&self) -> ProviderResult<RunscopeClient> {
        self.validate().map_err(ProviderError::config)?;
        info!("Configuring Runscope client for {}", self.api_url);
        RunscopeClient::new(&self.access_token, &self.api_url)
            .map_err(|e| ProviderError::config(e.to_string()))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
