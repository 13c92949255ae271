//! Nested block models and their expand/flatten functions.
//!
//! `expand_*` turns configuration blocks into API domain values, `flatten_*`
//! turns API values back into blocks for state. Set-backed blocks are
//! deduplicated on expand; list-backed blocks keep their order.

use crate::schema::unique_by;
use chrono::DateTime;
use runscope_api::{
    CreatedBy, Emails, EnvironmentRemoteAgent, Recipient, RemoteAgent, StepAssertion, StepAuth,
    StepVariable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Blocks ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableBlock {
    pub name: String,
    pub property: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertionBlock {
    pub source: String,
    pub property: String,
    pub comparison: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderBlock {
    pub header: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FormParameterBlock {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthBlock {
    pub username: String,
    pub auth_type: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailBlock {
    pub notify_all: bool,
    pub notify_on: String,
    pub notify_threshold: i64,
    pub recipient: Vec<RecipientBlock>,
}

/// Only `id` is user-supplied; `name` and `email` come back from the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipientBlock {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteAgentBlock {
    pub name: String,
    pub uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedByBlock {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Element of the `runscope_remote_agents` data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteAgentsDataBlock {
    pub id: String,
    pub name: String,
    pub version: String,
}

// ── Steps ───────────────────────────────────────────────────────────

pub fn expand_step_variables(blocks: &[VariableBlock]) -> Vec<StepVariable> {
    unique_by(blocks.to_vec(), |b| b.clone())
        .into_iter()
        .map(|b| StepVariable {
            name: b.name,
            property: b.property,
            source: b.source,
        })
        .collect()
}

pub fn flatten_step_variables(variables: &[StepVariable]) -> Vec<VariableBlock> {
    variables
        .iter()
        .map(|v| VariableBlock {
            name: v.name.clone(),
            property: v.property.clone(),
            source: v.source.clone(),
        })
        .collect()
}

pub fn expand_step_assertions(blocks: &[AssertionBlock]) -> Vec<StepAssertion> {
    blocks
        .iter()
        .map(|b| StepAssertion {
            source: b.source.clone(),
            property: b.property.clone(),
            comparison: b.comparison.clone(),
            value: b.value.clone(),
        })
        .collect()
}

pub fn flatten_step_assertions(assertions: &[StepAssertion]) -> Vec<AssertionBlock> {
    assertions
        .iter()
        .map(|a| AssertionBlock {
            source: a.source.clone(),
            property: a.property.clone(),
            comparison: a.comparison.clone(),
            value: a.value.clone(),
        })
        .collect()
}

/// Group `(name, value)` pairs into a multi-valued map, keeping value order.
fn expand_multimap<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> BTreeMap<String, Vec<String>> {
    let mut result: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in pairs {
        result.entry(name.to_string()).or_default().push(value.to_string());
    }
    result
}

pub fn expand_step_headers(blocks: &[HeaderBlock]) -> BTreeMap<String, Vec<String>> {
    let blocks = unique_by(blocks.to_vec(), |b| b.clone());
    expand_multimap(blocks.iter().map(|b| (b.header.as_str(), b.value.as_str())))
}

pub fn flatten_step_headers(headers: &BTreeMap<String, Vec<String>>) -> Vec<HeaderBlock> {
    headers
        .iter()
        .flat_map(|(header, values)| {
            values.iter().map(move |value| HeaderBlock {
                header: header.clone(),
                value: value.clone(),
            })
        })
        .collect()
}

pub fn expand_step_form(blocks: &[FormParameterBlock]) -> BTreeMap<String, Vec<String>> {
    let blocks = unique_by(blocks.to_vec(), |b| b.clone());
    expand_multimap(blocks.iter().map(|b| (b.name.as_str(), b.value.as_str())))
}

pub fn flatten_form_parameters(form: &BTreeMap<String, Vec<String>>) -> Vec<FormParameterBlock> {
    form.iter()
        .flat_map(|(name, values)| {
            values.iter().map(move |value| FormParameterBlock {
                name: name.clone(),
                value: value.clone(),
            })
        })
        .collect()
}

/// First block wins; no block means no auth.
pub fn expand_step_auth(blocks: &[AuthBlock]) -> StepAuth {
    blocks
        .first()
        .map(|b| StepAuth {
            username: b.username.clone(),
            password: b.password.clone(),
            auth_type: b.auth_type.clone(),
        })
        .unwrap_or_default()
}

pub fn flatten_step_auth(auth: &StepAuth) -> Vec<AuthBlock> {
    if auth.is_empty() {
        return Vec::new();
    }
    vec![AuthBlock {
        username: auth.username.clone(),
        auth_type: auth.auth_type.clone(),
        password: auth.password.clone(),
    }]
}

// ── Environments ────────────────────────────────────────────────────

/// No block means the default (unconfigured) email settings.
pub fn expand_emails(blocks: &[EmailBlock]) -> Emails {
    let Some(block) = blocks.first() else {
        return Emails::default();
    };
    let recipients = unique_by(block.recipient.clone(), |r| r.id.clone());
    Emails {
        notify_all: block.notify_all,
        notify_on: block.notify_on.clone(),
        notify_threshold: block.notify_threshold,
        recipients: recipients
            .into_iter()
            .map(|r| Recipient {
                id: r.id,
                name: r.name,
                email: r.email,
            })
            .collect(),
    }
}

/// Empty for the default settings, so an unset block stays unset.
pub fn flatten_emails(emails: &Emails) -> Vec<EmailBlock> {
    if emails.is_default() {
        return Vec::new();
    }
    vec![EmailBlock {
        notify_all: emails.notify_all,
        notify_on: emails.notify_on.clone(),
        notify_threshold: emails.notify_threshold,
        recipient: emails
            .recipients
            .iter()
            .map(|r| RecipientBlock {
                id: r.id.clone(),
                name: r.name.clone(),
                email: r.email.clone(),
            })
            .collect(),
    }]
}

pub fn expand_remote_agents(blocks: &[RemoteAgentBlock]) -> Vec<EnvironmentRemoteAgent> {
    unique_by(blocks.to_vec(), |b| b.clone())
        .into_iter()
        .map(|b| EnvironmentRemoteAgent {
            name: b.name,
            uuid: b.uuid,
        })
        .collect()
}

pub fn flatten_environment_remote_agents(agents: &[EnvironmentRemoteAgent]) -> Vec<RemoteAgentBlock> {
    agents
        .iter()
        .map(|a| RemoteAgentBlock {
            name: a.name.clone(),
            uuid: a.uuid.clone(),
        })
        .collect()
}

/// Deduplicate a string set, keeping first occurrences.
pub fn expand_string_set(values: &[String]) -> Vec<String> {
    unique_by(values.to_vec(), |v| v.clone())
}

// ── Misc ────────────────────────────────────────────────────────────

/// RFC 1123 in UTC; empty for the epoch.
pub fn flatten_time(unix_seconds: i64) -> String {
    if unix_seconds == 0 {
        return String::new();
    }
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|t| t.format("%a, %d %b %Y %H:%M:%S UTC").to_string())
        .unwrap_or_default()
}

pub fn flatten_created_by(created_by: &CreatedBy) -> Vec<CreatedByBlock> {
    vec![CreatedByBlock {
        id: created_by.id.clone(),
        name: created_by.name.clone(),
        email: created_by.email.clone(),
    }]
}

pub fn flatten_remote_agents(agents: &[RemoteAgent]) -> Vec<RemoteAgentsDataBlock> {
    agents
        .iter()
        .map(|a| RemoteAgentsDataBlock {
            id: a.id.clone(),
            name: a.name.clone(),
            version: a.version.clone(),
        })
        .collect()
}

/// The API echoes intervals as e.g. `1.0d`; configuration uses `1d`.
pub fn normalize_interval(interval: &str) -> String {
    interval.replace(".0", "")
}

// ── Tests ────────────────────────────────────────────────────────────
