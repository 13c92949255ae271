//! # runscope-api
//!
//! Client for the Runscope REST API, the backend of the Runscope Terraform
//! provider.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ BucketClient  TestClient  EnvironmentClient  StepClient   │
//! │ ScheduleClient  IntegrationClient  RemoteAgentClient      │
//! │   domain models  <-- From / to_schema -->  wire schema    │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//!                  ┌───────────▼───────────┐
//!                  │    RunscopeClient     │  bearer auth, envelope
//!                  │   (reqwest + serde)   │  unwrap, error mapping
//!                  └───────────────────────┘
//! ```
//!
//! Child resources are addressed through their parents, so every
//! operation takes the URI options that name the parent path.

pub mod bucket;
pub mod client;
pub mod environment;
pub mod error;
pub mod integration;
pub mod remote_agent;
pub mod schedule;
pub mod schema;
pub mod step;

pub use bucket::{Bucket, BucketClient, BucketCreateOpts, BucketDeleteOpts, BucketGetOpts, Team};
pub use client::{RunscopeClient, DEFAULT_ENDPOINT};
pub use environment::{
    Emails, Environment, EnvironmentBase, EnvironmentClient, EnvironmentRemoteAgent,
    EnvironmentScope, Recipient,
};
pub use error::{RunscopeError, RunscopeErrorKind, RunscopeResult};
pub use integration::{Integration, IntegrationClient, IntegrationListOpts};
pub use remote_agent::{RemoteAgent, RemoteAgentClient, RemoteAgentListOpts};
pub use schedule::{Schedule, ScheduleBase, ScheduleClient, ScheduleUriOpts};
pub use step::{Step, StepAssertion, StepAuth, StepBase, StepClient, StepUriOpts, StepVariable};
pub use test::{
    CreatedBy, Test, TestClient, TestCreateOpts, TestDeleteOpts, TestGetOpts, TestStep,
    TestUpdateOpts,
};
