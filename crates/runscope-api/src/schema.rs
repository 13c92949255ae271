//! Wire types for the Runscope REST API.
//!
//! Every response is wrapped in `{ "data": ..., "error": ..., "meta": ... }`.
//! The API emits `null` for many empty fields, so string, list and map
//! fields decode through [`nullable`] and land on their empty value.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Decode `null` (or a missing field, with `#[serde(default)]`) as `T::default()`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_empty(s: &str) -> bool {
    s.is_empty()
}

// ── Envelope ────────────────────────────────────────────────────────

/// Standard response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

// ── Buckets ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default, deserialize_with = "nullable")]
    pub key: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub team: BucketTeam,
    #[serde(default, deserialize_with = "nullable")]
    pub auth_token: String,
    #[serde(default, deserialize_with = "nullable")]
    pub default: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub verify_ssl: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub trigger_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketTeam {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
}

// ── Tests ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestCreateRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestUpdateRequest {
    pub name: String,
    pub description: String,
    pub default_environment_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Test {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub default_environment_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub steps: Vec<TestStep>,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub created_by: CreatedBy,
    #[serde(default, deserialize_with = "nullable")]
    pub trigger_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TestStep {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreatedBy {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
}

// ── Environments ────────────────────────────────────────────────────

/// Environment body, used for both requests and responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub script: String,
    #[serde(default, deserialize_with = "nullable")]
    pub preserve_cookies: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub initial_variables: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "nullable")]
    pub integrations: Vec<EnvironmentIntegration>,
    #[serde(default, deserialize_with = "nullable")]
    pub regions: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub remote_agents: Vec<EnvironmentRemoteAgent>,
    #[serde(default, deserialize_with = "nullable")]
    pub retry_on_failure: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub stop_on_failure: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub verify_ssl: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub webhooks: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub emails: Emails,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "is_empty")]
    pub parent_environment_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub client_certificate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentIntegration {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub integration_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRemoteAgent {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Emails {
    #[serde(default, deserialize_with = "nullable")]
    pub notify_all: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub notify_on: String,
    #[serde(default, deserialize_with = "nullable")]
    pub notify_threshold: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub recipients: Vec<Recipient>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
}

// ── Schedules ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, deserialize_with = "nullable", skip_serializing)]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub environment_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub interval: String,
    #[serde(default, deserialize_with = "nullable")]
    pub note: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing)]
    pub exported_at: i64,
}

// ── Steps ───────────────────────────────────────────────────────────

/// Step body, used for both requests and responses. The id is sent on update only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub step_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub method: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub variables: Vec<StepVariable>,
    #[serde(default, deserialize_with = "nullable")]
    pub assertions: Vec<StepAssertion>,
    #[serde(default, deserialize_with = "nullable")]
    pub headers: BTreeMap<String, Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub auth: StepAuth,
    #[serde(default, deserialize_with = "nullable")]
    pub body: String,
    #[serde(default, deserialize_with = "nullable")]
    pub form: BTreeMap<String, Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub scripts: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub before_scripts: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub note: String,
    #[serde(default, deserialize_with = "nullable")]
    pub skipped: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub duration: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepVariable {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub property: String,
    #[serde(default, deserialize_with = "nullable")]
    pub source: String,
}

/// `value` keeps the raw JSON: the API may hand back numbers as well as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepAssertion {
    #[serde(default, deserialize_with = "nullable")]
    pub source: String,
    #[serde(default, deserialize_with = "nullable")]
    pub property: String,
    #[serde(default, deserialize_with = "nullable")]
    pub comparison: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepAuth {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "is_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "is_empty")]
    pub password: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "is_empty")]
    pub auth_type: String,
}

// ── Team resources ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Integration {
    #[serde(default, deserialize_with = "nullable")]
    pub uuid: String,
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    pub integration_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteAgent {
    #[serde(default, rename = "agent_id", deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub version: String,
}

// ── Tests ────────────────────────────────────────────────────────────
