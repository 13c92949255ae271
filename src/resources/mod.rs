//! Managed resource handlers.
//!
//! Every handler receives the configured client explicitly. Create and update
//! finish with a read so state always reflects the server. A 404 on read
//! clears the id; a 404 anywhere else is an ordinary failure.

pub mod bucket;
pub mod environment;
pub mod schedule;
pub mod step;

use crate::error::{ProviderError, ProviderResult};
use crate::schema::Schema;
use crate::state::ResourceData;
use async_trait::async_trait;
use log::warn;
use runscope_api::{RunscopeClient, RunscopeError};

pub use bucket::BucketResource;
pub use environment::EnvironmentResource;
pub use schedule::ScheduleResource;
pub use step::StepResource;
pub use test::TestResource;

#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name, e.g. `runscope_bucket`.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Cross-attribute checks on top of the schema.
    fn validate(&self, _config: &ResourceData) -> ProviderResult<()> {
        Ok(())
    }

    async fn create(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()>;

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()>;

    async fn update(&self, _client: &RunscopeClient, _data: &mut ResourceData) -> ProviderResult<()> {
        Err(ProviderError::unsupported(format!(
            "{} does not support in-place updates",
            self.type_name()
        )))
    }

    async fn delete(&self, client: &RunscopeClient, data: &ResourceData) -> ProviderResult<()>;

    /// Turn an import id into partial state. The caller reads it afterwards.
    async fn import(&self, _client: &RunscopeClient, _id: &str) -> ProviderResult<ResourceData> {
        Err(ProviderError::unsupported(format!(
            "{} does not support import",
            self.type_name()
        )))
    }
}

/// Map an API failure to a handler error with a resource-specific prefix.
pub(crate) fn api_error(prefix: &'static str) -> impl Fn(RunscopeError) -> ProviderError {
    move |e| ProviderError::api(format!("{}: {}", prefix, e))
}

/// On 404 mark the object absent; otherwise fail with `prefix`.
pub(crate) fn read_failed(
    data: &mut ResourceData,
    type_name: &str,
    err: RunscopeError,
    prefix: Option<&'static str>,
) -> ProviderResult<()> {
    if err.is_not_found() {
        warn!("{} {} no longer exists, removing from state", type_name, data.id());
        data.clear();
        return Ok(());
    }
    Err(match prefix {
        Some(prefix) => api_error(prefix)(err),
        None => err.into(),
    })
}
