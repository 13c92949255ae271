//! Provider service: the configured client plus the registry.
//!
//! `ProviderService` is the single entry point the request dispatcher holds.
//! It is configured once per provider lifetime and passes its client to every
//! handler.

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{Plan, Provider, ProviderSchemas};
use crate::state::ResourceData;
use log::info;
use runscope_api::RunscopeClient;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to the service.
pub type ProviderServiceState = Arc<Mutex<ProviderService>>;

pub struct ProviderService {
    provider: Provider,
    client: Option<RunscopeClient>,
}

impl ProviderService {
    pub fn new() -> ProviderServiceState {
        Arc::new(Mutex::new(Self {
            provider: Provider::new(),
            client: None,
        }))
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    // ── Configuration ───────────────────────────────────────────────

    /// Resolve env fallbacks, validate, and build the API client.
    pub fn configure(&mut self, config: ProviderConfig) -> ProviderResult<()> {
        let config = config.with_env_fallback();
        let client = config.client()?;
        info!("Provider configured for {}", client.base_url());
        self.client = Some(client);
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> ProviderResult<&RunscopeClient> {
        self.client
            .as_ref()
            .ok_or_else(|| ProviderError::config("Provider is not configured"))
    }

    // ── Operations ──────────────────────────────────────────────────

    pub fn schemas(&self) -> ProviderSchemas {
        self.provider.schemas()
    }

    pub fn validate_resource(&self, type_name: &str, config: &ResourceData) -> ProviderResult<()> {
        self.provider.validate_resource(type_name, config)
    }

    pub fn validate_data_source(&self, type_name: &str, config: &ResourceData) -> ProviderResult<()> {
        self.provider.validate_data_source(type_name, config)
    }

    pub fn plan(&self, type_name: &str, prior: &ResourceData, config: &ResourceData) -> ProviderResult<Plan> {
        self.provider.plan(type_name, prior, config)
    }

    pub async fn create(&self, type_name: &str, planned: ResourceData) -> ProviderResult<ResourceData> {
        self.provider.create(self.client()?, type_name, planned).await
    }

    pub async fn read(&self, type_name: &str, state: ResourceData) -> ProviderResult<ResourceData> {
        self.provider.read(self.client()?, type_name, state).await
    }

    pub async fn update(
        &self,
        type_name: &str,
        prior: &ResourceData,
        planned: ResourceData,
    ) -> ProviderResult<ResourceData> {
        self.provider.update(self.client()?, type_name, prior, planned).await
    }

    pub async fn delete(&self, type_name: &str, state: &ResourceData) -> ProviderResult<()> {
        self.provider.delete(self.client()?, type_name, state).await
    }

    pub async fn import(&self, type_name: &str, id: &str) -> ProviderResult<ResourceData> {
        self.provider.import(self.client()?, type_name, id).await
    }

    pub async fn read_data_source(&self, type_name: &str, config: ResourceData) -> ProviderResult<ResourceData> {
        self.provider.read_data_source(self.client()?, type_name, config).await
    }
}
