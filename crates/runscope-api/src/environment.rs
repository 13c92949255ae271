//! Environment operations.
//!
//! An environment is either shared by every test in a bucket or scoped to
//! one test. [`EnvironmentScope`] picks the collection:
//!
//! - `/buckets/{b}/environments[/{id}]`            - shared
//! - `/buckets/{b}/tests/{t}/environments[/{id}]`  - test-scoped
//!
//! Both collections support `POST`, `GET`, `PUT` and `DELETE`.

use crate::client::RunscopeClient;
use crate::error::RunscopeResult;
use crate::schema;
use log::info;
use std::collections::BTreeMap;

// ── Domain types ────────────────────────────────────────────────────

/// Where an environment lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentScope {
    Shared { bucket_id: String },
    Test { bucket_id: String, test_id: String },
}

impl EnvironmentScope {
    /// Shared when `test_id` is absent or empty.
    pub fn new(bucket_id: impl Into<String>, test_id: Option<&str>) -> Self {
        let bucket_id = bucket_id.into();
        match test_id {
            Some(t) if !t.is_empty() => Self::Test {
                bucket_id,
                test_id: t.to_string(),
            },
            _ => Self::Shared { bucket_id },
        }
    }

    pub fn bucket_id(&self) -> &str {
        match self {
            Self::Shared { bucket_id } | Self::Test { bucket_id, .. } => bucket_id,
        }
    }

    pub fn test_id(&self) -> Option<&str> {
        match self {
            Self::Shared { .. } => None,
            Self::Test { test_id, .. } => Some(test_id),
        }
    }

    /// Collection URL.
    pub fn base_url(&self) -> String {
        match self {
            Self::Shared { bucket_id } => format!("/buckets/{}/environments", bucket_id),
            Self::Test { bucket_id, test_id } => {
                format!("/buckets/{}/tests/{}/environments", bucket_id, test_id)
            }
        }
    }

    /// Member URL.
    pub fn url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url(), id)
    }
}

/// Settable environment fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentBase {
    pub name: String,
    pub script: String,
    pub preserve_cookies: bool,
    pub initial_variables: BTreeMap<String, String>,
    /// Integration ids.
    pub integrations: Vec<String>,
    pub regions: Vec<String>,
    pub remote_agents: Vec<EnvironmentRemoteAgent>,
    pub retry_on_failure: bool,
    pub stop_on_failure: bool,
    pub verify_ssl: bool,
    pub webhooks: Vec<String>,
    pub emails: Emails,
    pub parent_environment_id: String,
    pub client_certificate: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub id: String,
    pub base: EnvironmentBase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvironmentRemoteAgent {
    pub name: String,
    pub uuid: String,
}

/// Notification settings. The all-empty value means "not configured".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Emails {
    pub notify_all: bool,
    pub notify_on: String,
    pub notify_threshold: i64,
    pub recipients: Vec<Recipient>,
}

impl Emails {
    pub fn is_default(&self) -> bool {
        !self.notify_all
            && self.notify_on.is_empty()
            && self.notify_threshold == 0
            && self.recipients.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipient {
    pub id: String,
    pub name: String,
    pub email: String,
}

// ── Schema translation ──────────────────────────────────────────────

impl EnvironmentBase {
    pub fn to_schema(&self) -> schema::Environment {
        schema::Environment {
            id: String::new(),
            name: self.name.clone(),
            script: self.script.clone(),
            preserve_cookies: self.preserve_cookies,
            initial_variables: self.initial_variables.clone(),
            integrations: self
                .integrations
                .iter()
                .map(|id| schema::EnvironmentIntegration {
                    id: id.clone(),
                    ..Default::default()
                })
                .collect(),
            regions: self.regions.clone(),
            remote_agents: self
                .remote_agents
                .iter()
                .map(|a| schema::EnvironmentRemoteAgent {
                    name: a.name.clone(),
                    uuid: a.uuid.clone(),
                })
                .collect(),
            retry_on_failure: self.retry_on_failure,
            stop_on_failure: self.stop_on_failure,
            verify_ssl: self.verify_ssl,
            webhooks: self.webhooks.clone(),
            emails: schema::Emails {
                notify_all: self.emails.notify_all,
                notify_on: self.emails.notify_on.clone(),
                notify_threshold: self.emails.notify_threshold,
                recipients: self
                    .emails
                    .recipients
                    .iter()
                    .map(|r| schema::Recipient {
                        id: r.id.clone(),
                        name: r.name.clone(),
                        email: r.email.clone(),
                    })
                    .collect(),
            },
            parent_environment_id: self.parent_environment_id.clone(),
            client_certificate: self.client_certificate.clone(),
        }
    }
}

impl From<schema::Environment> for Environment {
    fn from(s: schema::Environment) -> Self {
        Self {
            id: s.id,
            base: EnvironmentBase {
                name: s.name,
                script: s.script,
                preserve_cookies: s.preserve_cookies,
                initial_variables: s.initial_variables,
                integrations: s.integrations.into_iter().map(|i| i.id).collect(),
                regions: s.regions,
                remote_agents: s
                    .remote_agents
                    .into_iter()
                    .map(|a| EnvironmentRemoteAgent {
                        name: a.name,
                        uuid: a.uuid,
                    })
                    .collect(),
                retry_on_failure: s.retry_on_failure,
                stop_on_failure: s.stop_on_failure,
                verify_ssl: s.verify_ssl,
                webhooks: s.webhooks,
                emails: Emails {
                    notify_all: s.emails.notify_all,
                    notify_on: s.emails.notify_on,
                    notify_threshold: s.emails.notify_threshold,
                    recipients: s
                        .emails
                        .recipients
                        .into_iter()
                        .map(|r| Recipient {
                            id: r.id,
                            name: r.name,
                            email: r.email,
                        })
                        .collect(),
                },
                parent_environment_id: s.parent_environment_id,
                client_certificate: s.client_certificate,
            },
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Environment API operations.
pub struct EnvironmentClient;

impl EnvironmentClient {
    pub async fn create(
        client: &RunscopeClient,
        scope: &EnvironmentScope,
        base: &EnvironmentBase,
    ) -> RunscopeResult<Environment> {
        info!("Creating environment '{}' at {}", base.name, scope.base_url());
        let env: schema::Environment = client.post(&scope.base_url(), &base.to_schema()).await?;
        info!("Created environment {}", env.id);
        Ok(env.into())
    }

    pub async fn get(
        client: &RunscopeClient,
        scope: &EnvironmentScope,
        id: &str,
    ) -> RunscopeResult<Environment> {
        let env: schema::Environment = client.get(&scope.url(id)).await?;
        Ok(env.into())
    }

    pub async fn update(
        client: &RunscopeClient,
        scope: &EnvironmentScope,
        id: &str,
        base: &EnvironmentBase,
    ) -> RunscopeResult<Environment> {
        let env: schema::Environment = client.put(&scope.url(id), &base.to_schema()).await?;
        info!("Updated environment {}", id);
        Ok(env.into())
    }

    pub async fn delete(
        client: &RunscopeClient,
        scope: &EnvironmentScope,
        id: &str,
    ) -> RunscopeResult<()> {
        client.delete(&scope.url(id)).await?;
        info!("Deleted environment {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_urls() {
        let shared = EnvironmentScope::new("b1", None);
        assert_eq!(shared.base_url(), "/buckets/b1/environments");
        assert_eq!(shared.url("e1"), "/buckets/b1/environments/e1");
        assert_eq!(shared.test_id(), None);

        let scoped = EnvironmentScope::new("b1", Some("t1"));
        assert_eq!(scoped.base_url(), "/buckets/b1/tests/t1/environments");
        assert_eq!(scoped.url("e1"), "/buckets/b1/tests/t1/environments/e1");
        assert_eq!(scoped.bucket_id(), "b1");
    }

    #[test]
    fn test_empty_test_id_is_shared() {
        let scope = EnvironmentScope::new("b1", Some(""));
        assert_eq!(
            scope,
            EnvironmentScope::Shared {
                bucket_id: "b1".into()
            }
        );
    }

    #[test]
    fn test_emails_default_sentinel() {
        assert!(Emails::default().is_default());
        let threshold = Emails {
            notify_threshold: 3,
            ..Default::default()
        };
        assert!(!threshold.is_default());
        let recipients = Emails {
            recipients: vec![Recipient {
                id: "r1".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(!recipients.is_default());
    }

    #[test]
    fn test_integrations_expand_to_objects() {
        let base = EnvironmentBase {
            name: "env".into(),
            integrations: vec!["i1".into(), "i2".into()],
            ..Default::default()
        };
        let wire = serde_json::to_value(base.to_schema()).unwrap();
        assert_eq!(wire["integrations"][0]["id"], "i1");
        assert_eq!(wire["integrations"][1]["id"], "i2");

        let back = Environment::from(base.to_schema());
        assert_eq!(back.base, base);
    }
}
