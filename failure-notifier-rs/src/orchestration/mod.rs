//! Orchestration service clients
//!
//! The notifier only needs two CodePipeline operations. They sit behind
//! [`OrchestrationService`] so the dispatch logic can be exercised without
//! AWS, and so a dry-run client can stand in during local replays.

pub mod codepipeline;
pub mod dry_run;

pub use codepipeline::{CodePipelineClient, CodePipelineClientBuilder};
pub use dry_run::DryRunOrchestrator;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::NotifierConfig;
use crate::error::Result;

/// Operations consumed from the orchestration service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrchestrationService: Send + Sync {
    /// Mark a held job as failed
    async fn report_job_failure(
        &self,
        job_token: &str,
        message: &str,
        external_execution_id: &str,
    ) -> Result<()>;

    /// Abort an in-flight pipeline execution
    async fn stop_execution(
        &self,
        pipeline_name: &str,
        execution_id: &str,
        reason: &str,
        abandon: bool,
    ) -> Result<()>;
}

/// Build the service selected by the configuration
pub async fn from_config(config: &NotifierConfig) -> Arc<dyn OrchestrationService> {
    if config.dry_run {
        tracing::warn!("Dry run enabled, failure reports will not reach CodePipeline");
        return Arc::new(DryRunOrchestrator::new());
    }

    Arc::new(CodePipelineClient::from_config(config).await)
}
