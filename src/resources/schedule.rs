//! `runscope_schedule`: runs a test against an environment at a fixed interval.

use super::{api_error, read_failed, Resource};
use crate::error::ProviderResult;
use crate::schema::{Attribute, Schema};
use crate::state::ResourceData;
use crate::structures::{flatten_time, normalize_interval};
use async_trait::async_trait;
use runscope_api::{RunscopeClient, Schedule, ScheduleBase, ScheduleClient, ScheduleUriOpts};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "runscope_schedule";

pub const INTERVALS: &[&str] = &["1m", "5m", "15m", "30m", "1h", "6h", "1d"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScheduleConfig {
    bucket_id: String,
    test_id: String,
    environment_id: String,
    interval: String,
    note: String,
}

impl ScheduleConfig {
    fn uri(&self) -> ScheduleUriOpts {
        ScheduleUriOpts {
            bucket_id: self.bucket_id.clone(),
            test_id: self.test_id.clone(),
        }
    }

    fn to_base(&self) -> ScheduleBase {
        ScheduleBase {
            environment_id: self.environment_id.clone(),
            interval: self.interval.clone(),
            note: self.note.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct ScheduleState {
    environment_id: String,
    interval: String,
    note: String,
    exported_at: String,
}

impl From<&Schedule> for ScheduleState {
    fn from(s: &Schedule) -> Self {
        Self {
            environment_id: s.base.environment_id.clone(),
            interval: normalize_interval(&s.base.interval),
            note: s.base.note.clone(),
            exported_at: flatten_time(s.exported_at),
        }
    }
}

pub struct ScheduleResource;

#[async_trait]
impl Resource for ScheduleResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::string("bucket_id").required().force_new(),
            Attribute::string("test_id").required().force_new(),
            Attribute::string("environment_id").required(),
            Attribute::string("interval").required().one_of(INTERVALS),
            Attribute::string("note").optional(),
            Attribute::string("exported_at").computed(),
        ])
    }

    async fn create(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: ScheduleConfig = data.decode()?;
        let schedule = ScheduleClient::create(client, &config.uri(), &config.to_base())
            .await
            .map_err(api_error("Couldn't create schedule"))?;
        data.set_id(schedule.id);
        self.read(client, data).await
    }

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: ScheduleConfig = data.decode()?;
        let schedule = match ScheduleClient::get(client, &config.uri(), data.id()).await {
            Ok(s) => s,
            Err(e) => return read_failed(data, TYPE_NAME, e, Some("Couldn't read schedule")),
        };
        data.merge(&ScheduleState::from(&schedule))
    }

    async fn update(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: ScheduleConfig = data.decode()?;
        ScheduleClient::update(client, &config.uri(), data.id(), &config.to_base())
            .await
            .map_err(api_error("Error updating schedule"))?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &RunscopeClient, data: &ResourceData) -> ProviderResult<()> {
        let config: ScheduleConfig = data.decode()?;
        ScheduleClient::delete(client, &config.uri(), data.id())
            .await
            .map_err(api_error("Error deleting schedule"))
    }
}
