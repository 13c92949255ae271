//! Team remote agents (read-only).
//!
//! - `GET /teams/{team_id}/agents` - list remote agents

use crate::client::RunscopeClient;
use crate::error::RunscopeResult;
use crate::schema;
use log::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteAgent {
    pub id: String,
    pub name: String,
    pub version: String,
}

impl From<schema::RemoteAgent> for RemoteAgent {
    fn from(s: schema::RemoteAgent) -> Self {
        Self {
            id: s.id,
            name: s.name,
            version: s.version,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemoteAgentListOpts {
    pub team_uuid: String,
}

impl RemoteAgentListOpts {
    pub fn url(&self) -> String {
        format!("/teams/{}/agents", self.team_uuid)
    }
}

/// Remote agent API operations.
pub struct RemoteAgentClient;

impl RemoteAgentClient {
    pub async fn list(
        client: &RunscopeClient,
        opts: &RemoteAgentListOpts,
    ) -> RunscopeResult<Vec<RemoteAgent>> {
        let agents: Vec<schema::RemoteAgent> = client.get(&opts.url()).await?;
        debug!("Listed {} remote agents for team {}", agents.len(), opts.team_uuid);
        Ok(agents.into_iter().map(RemoteAgent::from).collect())
    }
}
