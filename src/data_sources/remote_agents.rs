//! `runscope_remote_agents` data source: every remote agent of a team.

use super::{timestamp_id, DataSource};
use crate::error::ProviderResult;
use crate::schema::{Attribute, Block, Schema};
use crate::state::ResourceData;
use crate::structures::flatten_remote_agents;
use async_trait::async_trait;
use runscope_api::{RemoteAgentClient, RemoteAgentListOpts, RunscopeClient};

pub struct RemoteAgentsDataSource;

#[async_trait]
impl DataSource for RemoteAgentsDataSource {
    fn type_name(&self) -> &'static str {
        "runscope_remote_agents"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::string("team_uuid").required(),
            Attribute::block_set(
                "remote_agents",
                Block::new(vec![
                    Attribute::string("id").computed(),
                    Attribute::string("name").computed(),
                    Attribute::string("version").computed(),
                ]),
            )
            .computed(),
        ])
    }

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let opts = RemoteAgentListOpts {
            team_uuid: data.get_str("team_uuid").to_string(),
        };
        let agents = RemoteAgentClient::list(client, &opts).await?;

        data.set_id(timestamp_id());
        data.set("remote_agents", serde_json::to_value(flatten_remote_agents(&agents))?);
        Ok(())
    }
}
