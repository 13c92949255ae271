//! Bucket operations.
//!
//! Endpoints:
//! - `GET    /buckets`                          - list buckets
//! - `POST   /buckets?name={n}&team_uuid={t}`   - create a bucket
//! - `GET    /buckets/{key}`                    - get a bucket
//! - `DELETE /buckets/{key}`                    - delete a bucket
//!
//! Buckets have no update; every field is fixed at creation.

use crate::client::RunscopeClient;
use crate::error::RunscopeResult;
use crate::schema;
use log::{debug, info};

// ── Domain types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    pub key: String,
    pub name: String,
    pub team: Team,
    pub auth_token: String,
    pub default: bool,
    pub verify_ssl: bool,
    pub trigger_url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub name: String,
    pub uuid: String,
}

impl From<schema::Bucket> for Bucket {
    fn from(s: schema::Bucket) -> Self {
        Self {
            key: s.key,
            name: s.name,
            team: Team {
                name: s.team.name,
                uuid: s.team.id,
            },
            auth_token: s.auth_token,
            default: s.default,
            verify_ssl: s.verify_ssl,
            trigger_url: s.trigger_url,
        }
    }
}

// ── Options ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct BucketCreateOpts {
    pub name: String,
    pub team_uuid: String,
}

#[derive(Debug, Clone, Default)]
pub struct BucketGetOpts {
    pub key: String,
}

impl BucketGetOpts {
    pub fn url(&self) -> String {
        format!("/buckets/{}", self.key)
    }
}

pub type BucketDeleteOpts = BucketGetOpts;

// ── Client ──────────────────────────────────────────────────────────

/// Bucket API operations.
pub struct BucketClient;

impl BucketClient {
    pub async fn create(client: &RunscopeClient, opts: &BucketCreateOpts) -> RunscopeResult<Bucket> {
        info!("Creating bucket: {}", opts.name);
        let bucket: schema::Bucket = client
            .post_query(
                "/buckets",
                &[("name", opts.name.as_str()), ("team_uuid", opts.team_uuid.as_str())],
            )
            .await?;
        info!("Created bucket {}", bucket.key);
        Ok(bucket.into())
    }

    pub async fn get(client: &RunscopeClient, opts: &BucketGetOpts) -> RunscopeResult<Bucket> {
        let bucket: schema::Bucket = client.get(&opts.url()).await?;
        Ok(bucket.into())
    }

    pub async fn delete(client: &RunscopeClient, opts: &BucketDeleteOpts) -> RunscopeResult<()> {
        client.delete(&opts.url()).await?;
        info!("Deleted bucket {}", opts.key);
        Ok(())
    }

    pub async fn list(client: &RunscopeClient) -> RunscopeResult<Vec<Bucket>> {
        let buckets: Vec<schema::Bucket> = client.get("/buckets").await?;
        debug!("Listed {} buckets", buckets.len());
        Ok(buckets.into_iter().map(Bucket::from).collect())
    }
}
