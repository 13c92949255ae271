//! `runscope_bucket`: create, read, delete and import by key. Every
//! configurable attribute forces replacement.

use super::{api_error, read_failed, Resource};
use crate::error::{ProviderError, ProviderResult};
use crate::schema::{Attribute, Schema};
use crate::state::ResourceData;
use async_trait::async_trait;
use runscope_api::{Bucket, BucketClient, BucketCreateOpts, BucketDeleteOpts, BucketGetOpts, RunscopeClient};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "runscope_bucket";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BucketConfig {
    name: String,
    team_uuid: String,
}

/// Attributes written back after a read. Shared with the bucket data source.
#[derive(Debug, Default, Serialize)]
pub struct BucketState {
    pub name: String,
    pub team_uuid: String,
    pub auth_token: String,
    pub default: bool,
    pub verify_ssl: bool,
    pub trigger_url: String,
}

impl From<&Bucket> for BucketState {
    fn from(b: &Bucket) -> Self {
        Self {
            name: b.name.clone(),
            team_uuid: b.team.uuid.clone(),
            auth_token: b.auth_token.clone(),
            default: b.default,
            verify_ssl: b.verify_ssl,
            trigger_url: b.trigger_url.clone(),
        }
    }
}

pub struct BucketResource;

#[async_trait]
impl Resource for BucketResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::string("name").required().force_new(),
            Attribute::string("team_uuid").required().force_new(),
            Attribute::string("auth_token").computed().sensitive(),
            Attribute::bool("default").computed(),
            Attribute::bool("verify_ssl").computed(),
            Attribute::string("trigger_url").computed(),
        ])
    }

    async fn create(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: BucketConfig = data.decode()?;
        let opts = BucketCreateOpts {
            name: config.name,
            team_uuid: config.team_uuid,
        };
        let bucket = BucketClient::create(client, &opts)
            .await
            .map_err(api_error("Failed to create bucket"))?;
        data.set_id(bucket.key);
        self.read(client, data).await
    }

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let opts = BucketGetOpts {
            key: data.id().to_string(),
        };
        let bucket = match BucketClient::get(client, &opts).await {
            Ok(b) => b,
            Err(e) => return read_failed(data, TYPE_NAME, e, None),
        };
        data.set_id(bucket.key.clone());
        data.merge(&BucketState::from(&bucket))
    }

    async fn delete(&self, client: &RunscopeClient, data: &ResourceData) -> ProviderResult<()> {
        let opts = BucketDeleteOpts {
            key: data.id().to_string(),
        };
        BucketClient::delete(client, &opts)
            .await
            .map_err(api_error("Error deleting bucket"))
    }

    async fn import(&self, client: &RunscopeClient, id: &str) -> ProviderResult<ResourceData> {
        let mut data = ResourceData::with_id(id);
        self.read(client, &mut data).await?;
        if data.is_absent() {
            return Err(ProviderError::import(format!("Couldn't find bucket: {}", id)));
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_forces_new_on_every_input() {
        let schema = BucketResource.schema();
        for attr in &schema.attributes {
            if attr.required {
                assert!(attr.force_new, "{} should force replacement", attr.name);
            }
        }
        assert!(schema.attribute("auth_token").map(|a| a.sensitive).unwrap_or(false));
    }

    #[test]
    fn test_state_from_bucket() {
        let bucket = Bucket {
            key: "k".into(),
            name: "n".into(),
            team: runscope_api::Team {
                name: "team".into(),
                uuid: "t-uuid".into(),
            },
            verify_ssl: true,
            ..Default::default()
        };
        let state = BucketState::from(&bucket);
        assert_eq!(state.team_uuid, "t-uuid");
        assert!(state.verify_ssl);
    }
}
