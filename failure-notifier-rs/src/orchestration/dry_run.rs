//! Orchestration service that only logs

use async_trait::async_trait;
use tracing::info;

use super::OrchestrationService;
use crate::error::Result;

/// Accepts every report without contacting CodePipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunOrchestrator;

impl DryRunOrchestrator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrchestrationService for DryRunOrchestrator {
    async fn report_job_failure(
        &self,
        _job_token: &str,
        message: &str,
        external_execution_id: &str,
    ) -> Result<()> {
        info!(
            failure_message = message,
            external_execution_id,
            "Dry run: would call PutJobFailureResult"
        );
        Ok(())
    }

    async fn stop_execution(
        &self,
        pipeline_name: &str,
        execution_id: &str,
        reason: &str,
        abandon: bool,
    ) -> Result<()> {
        info!(
            pipeline_name,
            execution_id,
            reason,
            abandon,
            "Dry run: would call StopPipelineExecution"
        );
        Ok(())
    }
}
