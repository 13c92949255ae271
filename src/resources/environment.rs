//! `runscope_environment`, shared by a bucket or scoped to one test.
//!
//! `test_id` picks the scope. `parent_environment_id` only makes sense for
//! test-scoped environments and is rejected before any request otherwise.

use super::{api_error, read_failed, Resource};
use crate::error::{ProviderError, ProviderResult};
use crate::schema::{Attribute, Block, Schema};
use crate::state::ResourceData;
use crate::structures::{
    expand_emails, expand_remote_agents, expand_string_set, flatten_emails,
    flatten_environment_remote_agents, EmailBlock, RemoteAgentBlock,
};
use async_trait::async_trait;
use runscope_api::{Environment, EnvironmentBase, EnvironmentClient, EnvironmentScope, RunscopeClient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TYPE_NAME: &str = "runscope_environment";

const NOTIFY_ON: &[&str] = &["all", "failures", "threshold", "switch"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvironmentConfig {
    bucket_id: String,
    test_id: String,
    name: String,
    script: String,
    preserve_cookies: bool,
    initial_variables: BTreeMap<String, String>,
    integrations: Vec<String>,
    regions: Vec<String>,
    remote_agent: Vec<RemoteAgentBlock>,
    retry_on_failure: bool,
    stop_on_failure: bool,
    verify_ssl: Option<bool>,
    webhooks: Vec<String>,
    email: Vec<EmailBlock>,
    parent_environment_id: String,
    client_certificate: String,
}

impl EnvironmentConfig {
    fn scope(&self) -> EnvironmentScope {
        EnvironmentScope::new(self.bucket_id.as_str(), Some(self.test_id.as_str()))
    }

    fn validate(&self) -> ProviderResult<()> {
        if self.test_id.is_empty() && !self.parent_environment_id.is_empty() {
            let mut err =
                ProviderError::validation("parent_environment_id could be set only if test_id defined");
            err.attribute = Some("parent_environment_id".to_string());
            return Err(err);
        }
        Ok(())
    }

    fn to_base(&self) -> EnvironmentBase {
        EnvironmentBase {
            name: self.name.clone(),
            script: self.script.clone(),
            preserve_cookies: self.preserve_cookies,
            initial_variables: self.initial_variables.clone(),
            integrations: expand_string_set(&self.integrations),
            regions: expand_string_set(&self.regions),
            remote_agents: expand_remote_agents(&self.remote_agent),
            retry_on_failure: self.retry_on_failure,
            stop_on_failure: self.stop_on_failure,
            verify_ssl: self.verify_ssl.unwrap_or(true),
            webhooks: expand_string_set(&self.webhooks),
            emails: expand_emails(&self.email),
            parent_environment_id: self.parent_environment_id.clone(),
            client_certificate: self.client_certificate.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct EnvironmentState {
    bucket_id: String,
    test_id: String,
    name: String,
    script: String,
    preserve_cookies: bool,
    initial_variables: BTreeMap<String, String>,
    integrations: Vec<String>,
    regions: Vec<String>,
    remote_agent: Vec<RemoteAgentBlock>,
    retry_on_failure: bool,
    stop_on_failure: bool,
    verify_ssl: bool,
    webhooks: Vec<String>,
    /// Left untouched when the server reports default settings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    email: Vec<EmailBlock>,
    parent_environment_id: String,
    client_certificate: String,
}

impl EnvironmentState {
    fn new(scope: &EnvironmentScope, env: &Environment) -> Self {
        let base = &env.base;
        Self {
            bucket_id: scope.bucket_id().to_string(),
            test_id: scope.test_id().unwrap_or_default().to_string(),
            name: base.name.clone(),
            script: base.script.clone(),
            preserve_cookies: base.preserve_cookies,
            initial_variables: base.initial_variables.clone(),
            integrations: base.integrations.clone(),
            regions: base.regions.clone(),
            remote_agent: flatten_environment_remote_agents(&base.remote_agents),
            retry_on_failure: base.retry_on_failure,
            stop_on_failure: base.stop_on_failure,
            verify_ssl: base.verify_ssl,
            webhooks: base.webhooks.clone(),
            email: flatten_emails(&base.emails),
            parent_environment_id: base.parent_environment_id.clone(),
            client_certificate: base.client_certificate.clone(),
        }
    }
}

pub struct EnvironmentResource;

#[async_trait]
impl Resource for EnvironmentResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::string("bucket_id").required().force_new(),
            Attribute::string("test_id").optional().force_new(),
            Attribute::string("name").required(),
            Attribute::string("script").optional(),
            Attribute::bool("preserve_cookies").optional(),
            Attribute::map("initial_variables").optional(),
            Attribute::string_set("integrations").optional(),
            Attribute::string_set("regions").optional().computed(),
            Attribute::block_set(
                "remote_agent",
                Block::new(vec![
                    Attribute::string("name").required(),
                    Attribute::string("uuid").required(),
                ]),
            )
            .optional()
            .computed(),
            Attribute::bool("retry_on_failure").optional(),
            Attribute::bool("stop_on_failure").optional(),
            Attribute::bool("verify_ssl").optional().default(true),
            Attribute::string_set("webhooks").optional(),
            Attribute::block_list(
                "email",
                Block::new(vec![
                    Attribute::bool("notify_all").optional().default(false),
                    Attribute::string("notify_on").optional().one_of(NOTIFY_ON),
                    Attribute::int("notify_threshold").optional().default(0),
                    Attribute::block_set(
                        "recipient",
                        Block::new(vec![
                            Attribute::string("id").required(),
                            Attribute::string("name").computed(),
                            Attribute::string("email").computed(),
                        ])
                        .hash_key("id"),
                    )
                    .optional(),
                ]),
            )
            .optional()
            .max_items(1),
            Attribute::string("parent_environment_id").optional(),
            Attribute::string("client_certificate").optional(),
        ])
    }

    fn validate(&self, config: &ResourceData) -> ProviderResult<()> {
        config.decode::<EnvironmentConfig>()?.validate()
    }

    async fn create(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: EnvironmentConfig = data.decode()?;
        config.validate()?;

        let env = EnvironmentClient::create(client, &config.scope(), &config.to_base())
            .await
            .map_err(api_error("Couldn't create environment"))?;
        data.set_id(env.id);
        self.read(client, data).await
    }

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: EnvironmentConfig = data.decode()?;
        let scope = config.scope();
        let env = match EnvironmentClient::get(client, &scope, data.id()).await {
            Ok(e) => e,
            Err(e) => return read_failed(data, TYPE_NAME, e, Some("Couldn't read environment")),
        };
        data.merge(&EnvironmentState::new(&scope, &env))
    }

    async fn update(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: EnvironmentConfig = data.decode()?;
        config.validate()?;

        EnvironmentClient::update(client, &config.scope(), data.id(), &config.to_base())
            .await
            .map_err(api_error("Couldn't update environment"))?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &RunscopeClient, data: &ResourceData) -> ProviderResult<()> {
        let config: EnvironmentConfig = data.decode()?;
        EnvironmentClient::delete(client, &config.scope(), data.id())
            .await
            .map_err(api_error("Error deleting environment"))
    }
}
