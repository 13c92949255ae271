//! Read-only data sources.

pub mod bucket;
pub mod buckets;
pub mod integration;
pub mod integrations;
pub mod remote_agents;

use crate::error::ProviderResult;
use crate::schema::Schema;
use crate::state::ResourceData;
use async_trait::async_trait;
use runscope_api::RunscopeClient;

pub use bucket::BucketDataSource;
pub use buckets::BucketsDataSource;
pub use integration::IntegrationDataSource;
pub use integrations::IntegrationsDataSource;
pub use remote_agents::RemoteAgentsDataSource;

#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Populate `data` (id and computed attributes) from its configuration.
    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()>;
}

/// Id for list results, which have no natural identity.
pub(crate) fn timestamp_id() -> String {
    chrono::Utc::now().to_string()
}
