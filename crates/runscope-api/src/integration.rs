//! Team integrations (read-only).
//!
//! - `GET /teams/{team_id}/integrations` - list integrations

use crate::client::RunscopeClient;
use crate::error::RunscopeResult;
use crate::schema;
use log::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Integration {
    pub uuid: String,
    pub integration_type: String,
    pub description: String,
}

impl From<schema::Integration> for Integration {
    fn from(s: schema::Integration) -> Self {
        Self {
            uuid: s.uuid,
            integration_type: s.integration_type,
            description: s.description,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntegrationListOpts {
    pub team_id: String,
}

impl IntegrationListOpts {
    pub fn url(&self) -> String {
        format!("/teams/{}/integrations", self.team_id)
    }
}

/// Integration API operations.
pub struct IntegrationClient;

impl IntegrationClient {
    pub async fn list(
        client: &RunscopeClient,
        opts: &IntegrationListOpts,
    ) -> RunscopeResult<Vec<Integration>> {
        let integrations: Vec<schema::Integration> = client.get(&opts.url()).await?;
        debug!(
            "Listed {} integrations for team {}",
            integrations.len(),
            opts.team_id
        );
        Ok(integrations.into_iter().map(Integration::from).collect())
    }
}
