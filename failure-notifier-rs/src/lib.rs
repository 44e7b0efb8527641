//! # Failure Notifier
//!
//! Reports failed CodeBuild runs back to the CodePipeline that started them.
//!
//! A CodeBuild project backing a custom pipeline action has no way to tell
//! the pipeline that it failed. An EventBridge rule forwards the build's
//! failure event to this function, which either
//!
//! - fails the pending job (`PutJobFailureResult`) when the build exported
//!   a job token, or
//! - abandons the pipeline execution (`StopPipelineExecution`) when it did not.
//!
//! ## Architecture
//!
//! - `FailureEvent`: inbound payload and variable lookup
//! - `FailureReport`: the single outbound call, as data
//! - `OrchestrationService`: seam over CodePipeline, with a dry-run stand-in
//! - `FailureNotifier`: classify and dispatch, logging through an injected
//!   `tracing` dispatcher
//! - `NotifierError`: malformed events and rejected calls

pub mod config;
pub use config::{ConfigProvider, NotifierConfig, VariableNames};

pub mod error;
pub use error::{NotifierError, Result};

pub mod event;
pub use event::{FailureEvent, Variable};

pub mod report;
pub use report::{FailureReport, ReportKind};

pub mod orchestration;
pub use orchestration::{CodePipelineClient, DryRunOrchestrator, OrchestrationService};

pub mod notifier;
pub use notifier::FailureNotifier;

pub mod handler;
pub mod logging;

#[cfg(test)]
mod tests;
