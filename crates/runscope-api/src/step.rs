//! Step operations.
//!
//! Endpoints:
//! - `POST   /buckets/{b}/tests/{t}/steps`       - append a step; returns every step of the test
//! - `GET    /buckets/{b}/tests/{t}/steps/{id}`  - get a step
//! - `PUT    /buckets/{b}/tests/{t}/steps/{id}`  - update a step (body includes the id)
//! - `DELETE /buckets/{b}/tests/{t}/steps/{id}`  - delete a step
//!
//! Assertion values always go out as JSON strings. On the way back a string
//! is taken as-is and any other JSON value keeps its literal text, so a
//! numeric `200` reads as `"200"`.

use crate::client::RunscopeClient;
use crate::error::{RunscopeError, RunscopeResult};
use crate::schema;
use log::{debug, info};
use std::collections::BTreeMap;

// ── Domain types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepBase {
    pub step_type: String,
    pub method: String,
    pub url: String,
    pub variables: Vec<StepVariable>,
    pub assertions: Vec<StepAssertion>,
    /// Header name to values; one name may repeat.
    pub headers: BTreeMap<String, Vec<String>>,
    pub auth: StepAuth,
    pub body: String,
    /// Form field name to values.
    pub form: BTreeMap<String, Vec<String>>,
    pub scripts: Vec<String>,
    pub before_scripts: Vec<String>,
    pub note: String,
    pub skipped: bool,
    pub duration: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub id: String,
    pub base: StepBase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepVariable {
    pub name: String,
    pub property: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepAssertion {
    pub source: String,
    pub property: String,
    pub comparison: String,
    pub value: String,
}

/// Request auth. All fields empty means "no auth".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepAuth {
    pub username: String,
    pub password: String,
    pub auth_type: String,
}

impl StepAuth {
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty() && self.auth_type.is_empty()
    }
}

// ── Schema translation ──────────────────────────────────────────────

/// Read side of the assertion value encoding. JSON `null` reads as `""`,
/// not the literal text `null`.
pub fn assertion_value_from_schema(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl StepBase {
    pub fn to_schema(&self) -> schema::Step {
        schema::Step {
            id: String::new(),
            step_type: self.step_type.clone(),
            method: self.method.clone(),
            url: self.url.clone(),
            variables: self
                .variables
                .iter()
                .map(|v| schema::StepVariable {
                    name: v.name.clone(),
                    property: v.property.clone(),
                    source: v.source.clone(),
                })
                .collect(),
            assertions: self
                .assertions
                .iter()
                .map(|a| schema::StepAssertion {
                    source: a.source.clone(),
                    property: a.property.clone(),
                    comparison: a.comparison.clone(),
                    value: serde_json::Value::String(a.value.clone()),
                })
                .collect(),
            headers: self.headers.clone(),
            auth: schema::StepAuth {
                username: self.auth.username.clone(),
                password: self.auth.password.clone(),
                auth_type: self.auth.auth_type.clone(),
            },
            body: self.body.clone(),
            form: self.form.clone(),
            scripts: self.scripts.clone(),
            before_scripts: self.before_scripts.clone(),
            note: self.note.clone(),
            skipped: self.skipped,
            duration: self.duration,
        }
    }
}

impl From<schema::Step> for Step {
    fn from(s: schema::Step) -> Self {
        Self {
            id: s.id,
            base: StepBase {
                step_type: s.step_type,
                method: s.method,
                url: s.url,
                variables: s
                    .variables
                    .into_iter()
                    .map(|v| StepVariable {
                        name: v.name,
                        property: v.property,
                        source: v.source,
                    })
                    .collect(),
                assertions: s
                    .assertions
                    .into_iter()
                    .map(|a| StepAssertion {
                        value: assertion_value_from_schema(&a.value),
                        source: a.source,
                        property: a.property,
                        comparison: a.comparison,
                    })
                    .collect(),
                headers: s.headers,
                auth: StepAuth {
                    username: s.auth.username,
                    password: s.auth.password,
                    auth_type: s.auth.auth_type,
                },
                body: s.body,
                form: s.form,
                scripts: s.scripts,
                before_scripts: s.before_scripts,
                note: s.note,
                skipped: s.skipped,
                duration: s.duration,
            },
        }
    }
}

// ── Options ─────────────────────────────────────────────────────────

/// Parent test of a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepUriOpts {
    pub bucket_id: String,
    pub test_id: String,
}

impl StepUriOpts {
    pub fn base_url(&self) -> String {
        format!("/buckets/{}/tests/{}/steps", self.bucket_id, self.test_id)
    }

    pub fn url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url(), id)
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Step API operations.
pub struct StepClient;

impl StepClient {
    /// Create a step. The API answers with the test's full step list and the
    /// new step is the last entry.
    pub async fn create(client: &RunscopeClient, uri: &StepUriOpts, base: &StepBase) -> RunscopeResult<Step> {
        info!("Creating {} step in test {}", base.step_type, uri.test_id);
        let steps: Vec<schema::Step> = client.post(&uri.base_url(), &base.to_schema()).await?;
        debug!("Test {} now has {} steps", uri.test_id, steps.len());
        let created = steps.into_iter().last().ok_or_else(|| {
            RunscopeError::parse(format!(
                "Step create response for test {} contained no steps",
                uri.test_id
            ))
        })?;
        info!("Created step {}", created.id);
        Ok(created.into())
    }

    pub async fn get(client: &RunscopeClient, uri: &StepUriOpts, id: &str) -> RunscopeResult<Step> {
        let step: schema::Step = client.get(&uri.url(id)).await?;
        Ok(step.into())
    }

    pub async fn update(
        client: &RunscopeClient,
        uri: &StepUriOpts,
        id: &str,
        base: &StepBase,
    ) -> RunscopeResult<Step> {
        let mut body = base.to_schema();
        body.id = id.to_string();
        let step: schema::Step = client.put(&uri.url(id), &body).await?;
        info!("Updated step {}", id);
        Ok(step.into())
    }

    pub async fn delete(client: &RunscopeClient, uri: &StepUriOpts, id: &str) -> RunscopeResult<()> {
        client.delete(&uri.url(id)).await?;
        info!("Deleted step {}", id);
        Ok(())
    }
}
