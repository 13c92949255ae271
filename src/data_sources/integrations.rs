//! `runscope_integrations` data source: ids of team integrations passing the
//! filters.

use super::{timestamp_id, DataSource};
use crate::error::ProviderResult;
use crate::filters::{filter_attribute, integration_filters_test, Filter};
use crate::schema::{Attribute, Schema};
use crate::state::ResourceData;
use async_trait::async_trait;
use runscope_api::{IntegrationClient, IntegrationListOpts, RunscopeClient};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IntegrationsConfig {
    team_uuid: String,
    filter: Vec<Filter>,
}

pub struct IntegrationsDataSource;

#[async_trait]
impl DataSource for IntegrationsDataSource {
    fn type_name(&self) -> &'static str {
        "runscope_integrations"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::string("team_uuid").required(),
            filter_attribute(),
            Attribute::string_set("ids").computed(),
        ])
    }

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: IntegrationsConfig = data.decode()?;
        let opts = IntegrationListOpts {
            team_id: config.team_uuid,
        };
        let ids: Vec<String> = IntegrationClient::list(client, &opts)
            .await?
            .into_iter()
            .filter(|i| integration_filters_test(i, &config.filter))
            .map(|i| i.uuid)
            .collect();

        data.set_id(timestamp_id());
        data.set("ids", ids);
        Ok(())
    }
}
