//! `runscope_step`: one request, condition, pause or subtest inside a test.
//!
//! Step order is owned by the test, so importing "the Nth step" goes through
//! the test's step list.

use super::{api_error, read_failed, Resource};
use crate::error::ProviderResult;
use crate::import::{resolve_step_position, StepImportId};
use crate::schema::{Attribute, Block, Schema};
use crate::state::ResourceData;
use crate::structures::{
    expand_step_assertions, expand_step_auth, expand_step_form, expand_step_headers,
    expand_step_variables, flatten_form_parameters, flatten_step_assertions, flatten_step_auth,
    flatten_step_headers, flatten_step_variables, AssertionBlock, AuthBlock, FormParameterBlock,
    HeaderBlock, VariableBlock,
};
use async_trait::async_trait;
use runscope_api::{RunscopeClient, Step, StepBase, StepClient, StepUriOpts, TestClient, TestGetOpts};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "runscope_step";

pub const STEP_SOURCES: &[&str] = &[
    "response_status",
    "response_headers",
    "response_json",
    "response_xml",
    "response_text",
    "response_time",
    "response_size",
];

pub const STEP_COMPARISONS: &[&str] = &[
    "equal",
    "empty",
    "not_empty",
    "not_equal",
    "contains",
    "does_not_contain",
    "is_a_number",
    "equal_number",
    "is_less_than",
    "is_less_than_or_equal",
    "is_greater_than",
    "is_greater_than_or_equal",
    "has_key",
    "has_value",
    "is_null",
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StepConfig {
    bucket_id: String,
    test_id: String,
    step_type: String,
    method: String,
    url: String,
    variable: Vec<VariableBlock>,
    assertion: Vec<AssertionBlock>,
    header: Vec<HeaderBlock>,
    auth: Vec<AuthBlock>,
    body: String,
    form_parameter: Vec<FormParameterBlock>,
    scripts: Vec<String>,
    before_scripts: Vec<String>,
    note: String,
    skipped: bool,
    duration: i64,
}

impl StepConfig {
    fn uri(&self) -> StepUriOpts {
        StepUriOpts {
            bucket_id: self.bucket_id.clone(),
            test_id: self.test_id.clone(),
        }
    }

    fn to_base(&self) -> StepBase {
        StepBase {
            step_type: self.step_type.clone(),
            method: self.method.clone(),
            url: self.url.clone(),
            variables: expand_step_variables(&self.variable),
            assertions: expand_step_assertions(&self.assertion),
            headers: expand_step_headers(&self.header),
            auth: expand_step_auth(&self.auth),
            body: self.body.clone(),
            form: expand_step_form(&self.form_parameter),
            scripts: self.scripts.clone(),
            before_scripts: self.before_scripts.clone(),
            note: self.note.clone(),
            skipped: self.skipped,
            duration: self.duration,
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct StepState {
    step_type: String,
    method: String,
    url: String,
    variable: Vec<VariableBlock>,
    assertion: Vec<AssertionBlock>,
    header: Vec<HeaderBlock>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    auth: Vec<AuthBlock>,
    body: String,
    form_parameter: Vec<FormParameterBlock>,
    scripts: Vec<String>,
    before_scripts: Vec<String>,
    note: String,
    skipped: bool,
    duration: i64,
}

impl From<&Step> for StepState {
    fn from(s: &Step) -> Self {
        let base = &s.base;
        Self {
            step_type: base.step_type.clone(),
            method: base.method.clone(),
            url: base.url.clone(),
            variable: flatten_step_variables(&base.variables),
            assertion: flatten_step_assertions(&base.assertions),
            header: flatten_step_headers(&base.headers),
            auth: flatten_step_auth(&base.auth),
            body: base.body.clone(),
            form_parameter: flatten_form_parameters(&base.form),
            scripts: base.scripts.clone(),
            before_scripts: base.before_scripts.clone(),
            note: base.note.clone(),
            skipped: base.skipped,
            duration: base.duration,
        }
    }
}

pub struct StepResource;

#[async_trait]
impl Resource for StepResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::string("bucket_id").required().force_new(),
            Attribute::string("test_id").required().force_new(),
            Attribute::string("step_type").required().force_new(),
            Attribute::string("method").optional(),
            Attribute::string("url").optional(),
            Attribute::block_set(
                "variable",
                Block::new(vec![
                    Attribute::string("name").required(),
                    Attribute::string("property").optional(),
                    Attribute::string("source").required().one_of(STEP_SOURCES),
                ]),
            )
            .optional(),
            Attribute::block_list(
                "assertion",
                Block::new(vec![
                    Attribute::string("source").required().one_of(STEP_SOURCES),
                    Attribute::string("property").optional(),
                    Attribute::string("comparison").required().one_of(STEP_COMPARISONS),
                    Attribute::string("value").optional(),
                ]),
            )
            .optional(),
            Attribute::block_set(
                "header",
                Block::new(vec![
                    Attribute::string("header").required(),
                    Attribute::string("value").required(),
                ]),
            )
            .optional(),
            Attribute::block_set(
                "auth",
                Block::new(vec![
                    Attribute::string("username").required(),
                    Attribute::string("auth_type").required(),
                    Attribute::string("password").required().sensitive(),
                ]),
            )
            .optional(),
            Attribute::string("body").optional(),
            Attribute::block_set(
                "form_parameter",
                Block::new(vec![
                    Attribute::string("name").required(),
                    Attribute::string("value").required(),
                ]),
            )
            .optional(),
            Attribute::string_list("scripts").optional(),
            Attribute::string_list("before_scripts").optional(),
            Attribute::string("note").optional(),
            Attribute::bool("skipped").optional(),
            Attribute::int("duration").optional().int_between(0, 180),
        ])
    }

    async fn create(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: StepConfig = data.decode()?;
        let step = StepClient::create(client, &config.uri(), &config.to_base())
            .await
            .map_err(api_error("Couldn't create step"))?;
        data.set_id(step.id);
        self.read(client, data).await
    }

    async fn read(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: StepConfig = data.decode()?;
        let step = match StepClient::get(client, &config.uri(), data.id()).await {
            Ok(s) => s,
            Err(e) => return read_failed(data, TYPE_NAME, e, Some("Couldn't read step")),
        };
        data.merge(&StepState::from(&step))
    }

    async fn update(&self, client: &RunscopeClient, data: &mut ResourceData) -> ProviderResult<()> {
        let config: StepConfig = data.decode()?;
        StepClient::update(client, &config.uri(), data.id(), &config.to_base())
            .await
            .map_err(api_error("Couldn't update step"))?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &RunscopeClient, data: &ResourceData) -> ProviderResult<()> {
        let config: StepConfig = data.decode()?;
        StepClient::delete(client, &config.uri(), data.id())
            .await
            .map_err(api_error("Couldn't delete step"))
    }

    async fn import(&self, client: &RunscopeClient, id: &str) -> ProviderResult<ResourceData> {
        let parsed = StepImportId::parse(id)?;
        let step_id = match &parsed {
            StepImportId::ById { step_id, .. } => step_id.clone(),
            StepImportId::ByPosition {
                bucket_id,
                test_id,
                position,
            } => {
                let opts = TestGetOpts {
                    bucket_id: bucket_id.clone(),
                    id: test_id.clone(),
                };
                let test = TestClient::get(client, &opts)
                    .await
                    .map_err(api_error("Couldn't read test"))?;
                resolve_step_position(test_id, *position, &test.steps)?
            }
        };

        let mut data = ResourceData::with_id(step_id);
        data.set("bucket_id", parsed.bucket_id());
        data.set("test_id", parsed.test_id());
        Ok(data)
    }
}
