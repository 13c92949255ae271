//! `runscope_bucket` data source: look a bucket up by key.

use super::DataSource;
use crate::error::ProviderResult;
use crate::resources::bucket::BucketState;
use crate::schema::{Attribute, Schema};
use crate::state::ResourceData;
use async_trait::async_trait;
use runscope_api::{BucketClient, BucketGetOpts, RunscopeClient};

pub struct BucketDataSource;

#[async_trait]
impl DataSource for BucketDataSource {
    fn type_name(&self) -> &'static str {
        "runscope_bucket"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::string("key").required(),
            Attribute::string("name").computed(),
            Attribute::string("team_uuid").computed(),
            Attribute::string("auth_token").computed().sensitive(),
            Attribute::bool("default").computed(),
            Attribute::bool("verify_ssl").computed(),
            Attribute::string("trigger_url").computed(),
        ])
    }

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let opts = BucketGetOpts {
            key: data.get_str("key").to_string(),
        };
        let bucket = BucketClient::get(client, &opts).await?;
        data.set_id(bucket.key.clone());
        data.merge(&BucketState::from(&bucket))
    }
}
