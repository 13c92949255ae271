//! `runscope_buckets` data source: keys of every bucket passing the filters.

use super::{timestamp_id, DataSource};
use crate::error::ProviderResult;
use crate::filters::{bucket_filters_test, filter_attribute, Filter};
use crate::schema::{Attribute, Schema};
use crate::state::ResourceData;
use async_trait::async_trait;
use log::debug;
use runscope_api::{BucketClient, RunscopeClient};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BucketsConfig {
    filter: Vec<Filter>,
}

pub struct BucketsDataSource;

#[async_trait]
impl DataSource for BucketsDataSource {
    fn type_name(&self) -> &'static str {
        "runscope_buckets"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            filter_attribute(),
            Attribute::string_set("keys").computed(),
        ])
    }

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: BucketsConfig = data.decode()?;
        let buckets = BucketClient::list(client).await?;

        let keys: Vec<String> = buckets
            .iter()
            .filter(|b| bucket_filters_test(b, &config.filter))
            .map(|b| b.key.clone())
            .collect();
        debug!("{} of {} buckets matched", keys.len(), buckets.len());

        data.set_id(timestamp_id());
        data.set("keys", keys);
        Ok(())
    }
}
