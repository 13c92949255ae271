//! Request dispatch at the host boundary.
//!
//! One JSON [`ProviderRequest`] in, one JSON [`ProviderResponse`] out. Every
//! failure becomes a single error diagnostic; nothing is retried.

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::ProviderSchemas;
use crate::service::ProviderServiceState;
use crate::state::ResourceData;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Schema,
    Validate,
    Plan,
    Create,
    Read,
    Update,
    Delete,
    Import,
    ReadDataSource,
}

impl Operation {
    fn needs_client(self) -> bool {
        !matches!(self, Self::Schema | Self::Validate | Self::Plan)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRequest {
    pub operation: Operation,
    #[serde(default)]
    pub type_name: String,
    /// Provider block.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Configuration, planned state or current state depending on the operation.
    #[serde(default)]
    pub state: ResourceData,
    #[serde(default)]
    pub prior_state: ResourceData,
    #[serde(default)]
    pub import_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl From<ProviderError> for Diagnostic {
    fn from(e: ProviderError) -> Self {
        Self {
            severity: Severity::Error,
            summary: e.message,
            attribute: e.attribute,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderResponse {
    /// `None` when the object is absent or the operation yields no state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ResourceData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<ProviderSchemas>,
    pub diagnostics: Vec<Diagnostic>,
    /// Attributes a plan changes; empty for a no-op plan.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires_replace: Vec<String>,
}

impl ProviderResponse {
    fn with_state(state: ResourceData) -> Self {
        Self {
            state: (!state.is_absent()).then_some(state),
            ..Default::default()
        }
    }

    pub fn error(e: ProviderError) -> Self {
        Self {
            diagnostics: vec![e.into()],
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}

/// Run one request against the service.
pub async fn handle_request(state: &ProviderServiceState, request: ProviderRequest) -> ProviderResponse {
    debug!("{:?} {}", request.operation, request.type_name);
    match dispatch(state, request).await {
        Ok(response) => response,
        Err(e) => ProviderResponse::error(e),
    }
}

async fn dispatch(state: &ProviderServiceState, request: ProviderRequest) -> ProviderResult<ProviderResponse> {
    let mut svc = state.lock().await;
    if request.operation.needs_client() && !svc.is_configured() {
        svc.configure(request.provider.clone())?;
    }

    let type_name = request.type_name.as_str();
    let response = match request.operation {
        Operation::Schema => ProviderResponse {
            schemas: Some(svc.schemas()),
            ..Default::default()
        },
        Operation::Validate => {
            if svc.provider().resource(type_name).is_ok() {
                svc.validate_resource(type_name, &request.state)?;
            } else {
                svc.validate_data_source(type_name, &request.state)?;
            }
            ProviderResponse::default()
        }
        Operation::Plan => {
            let plan = svc.plan(type_name, &request.prior_state, &request.state)?;
            ProviderResponse {
                state: Some(plan.planned),
                changes: plan.changes,
                requires_replace: plan.requires_replace,
                ..Default::default()
            }
        }
        Operation::Create => ProviderResponse::with_state(svc.create(type_name, request.state).await?),
        Operation::Read => ProviderResponse::with_state(svc.read(type_name, request.state).await?),
        Operation::Update => ProviderResponse::with_state(
            svc.update(type_name, &request.prior_state, request.state).await?,
        ),
        Operation::Delete => {
            svc.delete(type_name, &request.state).await?;
            ProviderResponse::default()
        }
        Operation::Import => {
            ProviderResponse::with_state(svc.import(type_name, &request.import_id).await?)
        }
        Operation::ReadDataSource => {
            ProviderResponse::with_state(svc.read_data_source(type_name, request.state).await?)
        }
    };
    Ok(response)
}

// ── Tests ────────────────────────────────────────────────────────────
