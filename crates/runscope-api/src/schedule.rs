//! Schedule operations.
//!
//! Endpoints:
//! - `POST   /buckets/{b}/tests/{t}/schedules`       - create a schedule
//! - `GET    /buckets/{b}/tests/{t}/schedules/{id}`  - get a schedule
//! - `PUT    /buckets/{b}/tests/{t}/schedules/{id}`  - update a schedule
//! - `DELETE /buckets/{b}/tests/{t}/schedules/{id}`  - delete a schedule

use crate::client::RunscopeClient;
use crate::error::RunscopeResult;
use crate::schema;
use log::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleBase {
    pub environment_id: String,
    pub interval: String,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub id: String,
    pub base: ScheduleBase,
    /// Unix seconds; zero when never exported.
    pub exported_at: i64,
}

impl ScheduleBase {
    fn to_schema(&self) -> schema::Schedule {
        schema::Schedule {
            environment_id: self.environment_id.clone(),
            interval: self.interval.clone(),
            note: self.note.clone(),
            ..Default::default()
        }
    }
}

impl From<schema::Schedule> for Schedule {
    fn from(s: schema::Schedule) -> Self {
        Self {
            id: s.id,
            base: ScheduleBase {
                environment_id: s.environment_id,
                interval: s.interval,
                note: s.note,
            },
            exported_at: s.exported_at,
        }
    }
}

/// Parent test of a schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleUriOpts {
    pub bucket_id: String,
    pub test_id: String,
}

impl ScheduleUriOpts {
    pub fn base_url(&self) -> String {
        format!("/buckets/{}/tests/{}/schedules", self.bucket_id, self.test_id)
    }

    pub fn url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url(), id)
    }
}

/// Schedule API operations.
pub struct ScheduleClient;

impl ScheduleClient {
    pub async fn create(
        client: &RunscopeClient,
        uri: &ScheduleUriOpts,
        base: &ScheduleBase,
    ) -> RunscopeResult<Schedule> {
        info!("Creating {} schedule for test {}", base.interval, uri.test_id);
        let schedule: schema::Schedule = client.post(&uri.base_url(), &base.to_schema()).await?;
        info!("Created schedule {}", schedule.id);
        Ok(schedule.into())
    }

    pub async fn get(client: &RunscopeClient, uri: &ScheduleUriOpts, id: &str) -> RunscopeResult<Schedule> {
        let schedule: schema::Schedule = client.get(&uri.url(id)).await?;
        Ok(schedule.into())
    }

    pub async fn update(
        client: &RunscopeClient,
        uri: &ScheduleUriOpts,
        id: &str,
        base: &ScheduleBase,
    ) -> RunscopeResult<Schedule> {
        let schedule: schema::Schedule = client.put(&uri.url(id), &base.to_schema()).await?;
        info!("Updated schedule {}", id);
        Ok(schedule.into())
    }

    pub async fn delete(client: &RunscopeClient, uri: &ScheduleUriOpts, id: &str) -> RunscopeResult<()> {
        client.delete(&uri.url(id)).await?;
        info!("Deleted schedule {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let uri = ScheduleUriOpts {
            bucket_id: "b".into(),
            test_id: "t".into(),
        };
        assert_eq!(uri.base_url(), "/buckets/b/tests/t/schedules");
        assert_eq!(uri.url("s"), "/buckets/b/tests/t/schedules/s");
    }

    #[test]
    fn test_from_schema() {
        let schedule = Schedule::from(schema::Schedule {
            id: "s".into(),
            environment_id: "e".into(),
            interval: "1.0d".into(),
            note: "".into(),
            exported_at: 1_600_000_000,
        });
        assert_eq!(schedule.base.interval, "1.0d");
        assert_eq!(schedule.exported_at, 1_600_000_000);
    }
}
