//! Provider registration and lifecycle orchestration.
//!
//! [`Provider`] owns the resource and data source registries and runs the
//! engine-facing steps around each handler: schema validation, planning,
//! reconciling plans with prior state, and the read that follows an import.

use crate::data_sources::{
    BucketDataSource, BucketsDataSource, DataSource, IntegrationDataSource,
    IntegrationsDataSource, RemoteAgentsDataSource,
};
use crate::error::{ProviderError, ProviderResult};
use crate::resources::{
    BucketResource, EnvironmentResource, Resource, ScheduleResource, StepResource, TestResource,
};
use crate::schema::{Attribute, Schema};
use crate::state::ResourceData;
use log::{debug, info};
use runscope_api::RunscopeClient;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Every declared schema, keyed by type name.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchemas {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

/// Planned state, the attributes that change, and those that force
/// replacement. An empty `changes` against existing state is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub planned: ResourceData,
    pub changes: Vec<String>,
    pub requires_replace: Vec<String>,
}

pub struct Provider {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Arc<dyn DataSource>>,
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider {
    pub fn new() -> Self {
        let resources: Vec<Arc<dyn Resource>> = vec![
            Arc::new(BucketResource),
            Arc::new(TestResource),
            Arc::new(EnvironmentResource),
            Arc::new(ScheduleResource),
            Arc::new(StepResource),
        ];
        let data_sources: Vec<Arc<dyn DataSource>> = vec![
            Arc::new(IntegrationDataSource),
            Arc::new(IntegrationsDataSource),
            Arc::new(BucketDataSource),
            Arc::new(BucketsDataSource),
            Arc::new(RemoteAgentsDataSource),
        ];

        Self {
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources.into_iter().map(|d| (d.type_name(), d)).collect(),
        }
    }

    /// Provider block attributes.
    pub fn config_schema() -> Schema {
        Schema::new(vec![
            Attribute::string("access_token").required().sensitive(),
            Attribute::string("api_url").optional(),
        ])
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    pub fn data_source_types(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }

    pub fn resource(&self, type_name: &str) -> ProviderResult<Arc<dyn Resource>> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(format!("Unknown resource type: {}", type_name)))
    }

    pub fn data_source(&self, type_name: &str) -> ProviderResult<Arc<dyn DataSource>> {
        self.data_sources.get(type_name).cloned().ok_or_else(|| {
            ProviderError::not_found(format!("Unknown data source type: {}", type_name))
        })
    }

    pub fn schemas(&self) -> ProviderSchemas {
        ProviderSchemas {
            provider: Self::config_schema(),
            resources: self
                .resources
                .iter()
                .map(|(name, r)| (name.to_string(), r.schema()))
                .collect(),
            data_sources: self
                .data_sources
                .iter()
                .map(|(name, d)| (name.to_string(), d.schema()))
                .collect(),
        }
    }

    // ── Validation & planning ───────────────────────────────────────

    pub fn validate_resource(&self, type_name: &str, config: &ResourceData) -> ProviderResult<()> {
        let resource = self.resource(type_name)?;
        resource.schema().validate(&config.attributes)?;
        resource.validate(config)
    }

    pub fn validate_data_source(&self, type_name: &str, config: &ResourceData) -> ProviderResult<()> {
        self.data_source(type_name)?.schema().validate(&config.attributes)
    }

    /// Plan `config` against `prior`. An absent prior plans a create.
    pub fn plan(&self, type_name: &str, prior: &ResourceData, config: &ResourceData) -> ProviderResult<Plan> {
        self.validate_resource(type_name, config)?;
        let schema = self.resource(type_name)?.schema();

        let mut planned = config.clone();
        planned.set_id(prior.id());
        schema.apply_defaults(&mut planned.attributes);

        let prior_attributes = if prior.is_absent() {
            Default::default()
        } else {
            prior.attributes.clone()
        };
        let requires_replace = schema.requires_replace(&prior_attributes, &planned.attributes);
        if requires_replace.is_empty() {
            schema.reconcile(&prior_attributes, &mut planned.attributes);
        } else {
            debug!("{} {} must be replaced: {:?}", type_name, prior.id(), requires_replace);
        }
        let changes = schema.changed_attributes(&prior_attributes, &planned.attributes);

        Ok(Plan {
            planned,
            changes,
            requires_replace,
        })
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    pub async fn create(
        &self,
        client: &RunscopeClient,
        type_name: &str,
        mut planned: ResourceData,
    ) -> ProviderResult<ResourceData> {
        let resource = self.resource(type_name)?;
        resource.schema().apply_defaults(&mut planned.attributes);
        resource.create(client, &mut planned).await?;
        info!("Created {} {}", type_name, planned.id());
        Ok(planned)
    }

    /// Refresh. The returned data is absent when the object is gone.
    pub async fn read(
        &self,
        client: &RunscopeClient,
        type_name: &str,
        mut state: ResourceData,
    ) -> ProviderResult<ResourceData> {
        self.resource(type_name)?.read(client, &mut state).await?;
        Ok(state)
    }

    pub async fn update(
        &self,
        client: &RunscopeClient,
        type_name: &str,
        prior: &ResourceData,
        mut planned: ResourceData,
    ) -> ProviderResult<ResourceData> {
        let resource = self.resource(type_name)?;
        let schema = resource.schema();
        planned.set_id(prior.id());
        schema.apply_defaults(&mut planned.attributes);
        schema.reconcile(&prior.attributes, &mut planned.attributes);
        resource.update(client, &mut planned).await?;
        Ok(planned)
    }

    pub async fn delete(&self, client: &RunscopeClient, type_name: &str, state: &ResourceData) -> ProviderResult<()> {
        self.resource(type_name)?.delete(client, state).await
    }

    /// Import by composite id, then read. A missing object is an error here.
    pub async fn import(&self, client: &RunscopeClient, type_name: &str, id: &str) -> ProviderResult<ResourceData> {
        let resource = self.resource(type_name)?;
        let mut data = resource.import(client, id).await?;
        resource.read(client, &mut data).await?;
        if data.is_absent() {
            return Err(ProviderError::import(format!(
                "Cannot import non-existent remote object {} {}",
                type_name, id
            )));
        }
        info!("Imported {} {}", type_name, data.id());
        Ok(data)
    }

    pub async fn read_data_source(
        &self,
        client: &RunscopeClient,
        type_name: &str,
        mut config: ResourceData,
    ) -> ProviderResult<ResourceData> {
        let data_source = self.data_source(type_name)?;
        data_source.schema().validate(&config.attributes)?;
        data_source.read(client, &mut config).await?;
        Ok(config)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
