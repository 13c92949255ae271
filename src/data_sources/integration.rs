//! `runscope_integration` data source: first team integration of a type that
//! also passes the filters.

use super::DataSource;
use crate::error::{ProviderError, ProviderResult};
use crate::filters::{filter_attribute, integration_filters_test, Filter};
use crate::schema::{Attribute, Schema};
use crate::state::ResourceData;
use async_trait::async_trait;
use runscope_api::{IntegrationClient, IntegrationListOpts, RunscopeClient};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IntegrationConfig {
    team_uuid: String,
    #[serde(rename = "type")]
    integration_type: String,
    filter: Vec<Filter>,
}

pub struct IntegrationDataSource;

#[async_trait]
impl DataSource for IntegrationDataSource {
    fn type_name(&self) -> &'static str {
        "runscope_integration"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::string("team_uuid").required(),
            filter_attribute(),
            Attribute::string("type").required(),
            Attribute::string("description").computed(),
        ])
    }

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: IntegrationConfig = data.decode()?;
        let opts = IntegrationListOpts {
            team_id: config.team_uuid.clone(),
        };
        let integrations = IntegrationClient::list(client, &opts).await?;

        let found = integrations
            .into_iter()
            .filter(|i| i.integration_type == config.integration_type)
            .find(|i| integration_filters_test(i, &config.filter))
            .ok_or_else(|| {
                ProviderError::not_found(format!(
                    "Unable to locate any integrations with the type: {}",
                    config.integration_type
                ))
            })?;

        data.set_id(found.uuid);
        data.set("type", found.integration_type);
        data.set("description", found.description);
        Ok(())
    }
}
