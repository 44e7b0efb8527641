//! Outbound failure reports

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which CodePipeline operation a report maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    /// `PutJobFailureResult` on a held job
    JobFailure,
    /// `StopPipelineExecution` on a running execution
    ExecutionStop,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::JobFailure => write!(f, "job_failure"),
            ReportKind::ExecutionStop => write!(f, "execution_stop"),
        }
    }
}

/// A failure to record with the orchestration service. Built per event and
/// dropped once delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReport {
    /// Fail the job that is waiting on this build
    JobFailure {
        job_token: String,
        message: String,
        external_execution_id: String,
    },
    /// Abort the pipeline execution that started this build
    ExecutionStop {
        pipeline_name: String,
        execution_id: String,
        reason: String,
        abandon: bool,
    },
}

impl FailureReport {
    pub fn job_failure(
        job_token: impl Into<String>,
        message: impl Into<String>,
        external_execution_id: impl Into<String>,
    ) -> Self {
        FailureReport::JobFailure {
            job_token: job_token.into(),
            message: message.into(),
            external_execution_id: external_execution_id.into(),
        }
    }

    /// Stops always abandon the execution
    pub fn execution_stop(
        pipeline_name: impl Into<String>,
        execution_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FailureReport::ExecutionStop {
            pipeline_name: pipeline_name.into(),
            execution_id: execution_id.into(),
            reason: reason.into(),
            abandon: true,
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            FailureReport::JobFailure { .. } => ReportKind::JobFailure,
            FailureReport::ExecutionStop { .. } => ReportKind::ExecutionStop,
        }
    }

    /// Job token or execution id
    pub fn identifier(&self) -> &str {
        match self {
            FailureReport::JobFailure { job_token, .. } => job_token,
            FailureReport::ExecutionStop { execution_id, .. } => execution_id,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FailureReport::JobFailure { message, .. } => message,
            FailureReport::ExecutionStop { reason, .. } => reason,
        }
    }

    /// Log link for job failures, pipeline name for stops
    pub fn link(&self) -> &str {
        match self {
            FailureReport::JobFailure { external_execution_id, .. } => external_execution_id,
            FailureReport::ExecutionStop { pipeline_name, .. } => pipeline_name,
        }
    }
}
