//! # terraform-provider-runscope
//!
//! Terraform provider for Runscope: buckets, tests, environments, schedules
//! and steps as managed resources, plus bucket, integration and remote agent
//! data sources.
//!
//! ```text
//!  host request ──► commands ──► service ──► provider ──► resources / data_sources
//!                                                            │        ▲
//!                                               expand (structures)  flatten
//!                                                            ▼        │
//!                                                       runscope-api clients
//! ```
//!
//! Attribute declarations live in [`schema`]; state travels as
//! [`state::ResourceData`] and is decoded into typed configuration once per
//! handler call.

pub mod commands;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod filters;
pub mod import;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod service;
pub mod state;
pub mod structures;
pub mod telemetry;

pub use commands::{handle_request, Diagnostic, Operation, ProviderRequest, ProviderResponse, Severity};
pub use config::ProviderConfig;
pub use error::{ProviderError, ProviderErrorKind, ProviderResult};
pub use provider::{Plan, Provider, ProviderSchemas};
pub use service::{ProviderService, ProviderServiceState};
pub use state::ResourceData;
