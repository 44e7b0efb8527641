//! Failure notifier
//!
//! Classifies a build failure event and reports it to the orchestration
//! service with exactly one call:
//!
//! - non-empty job token: the build ran as a synchronous job, so the job is
//!   failed with `PutJobFailureResult` and the log link as external id
//! - empty job token: the build was started asynchronously by the pipeline,
//!   so the execution is stopped (abandoned) with `StopPipelineExecution`
//!
//! Nothing here is retried. The boolean returned by [`FailureNotifier::notify`]
//! says whether CodePipeline accepted the report, not whether the build passed.

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info, warn, Dispatch};

use crate::config::{NotifierConfig, VariableNames};
use crate::error::{NotifierError, Result};
use crate::event::FailureEvent;
use crate::orchestration::OrchestrationService;
use crate::report::FailureReport;

/// Reports failed builds to the orchestration service
#[derive(Clone)]
pub struct FailureNotifier {
    service: Arc<dyn OrchestrationService>,
    failure_message: String,
    variables: VariableNames,
    dispatch: Dispatch,
}

impl FailureNotifier {
    /// Create a notifier with the default configuration.
    ///
    /// Logs go to whichever `tracing` dispatcher is current when this is
    /// called; use [`FailureNotifier::with_dispatch`] to pick another one.
    pub fn new(service: Arc<dyn OrchestrationService>) -> Self {
        Self::with_config(service, &NotifierConfig::default())
    }

    /// Create a notifier from configuration
    pub fn with_config(service: Arc<dyn OrchestrationService>, config: &NotifierConfig) -> Self {
        Self {
            service,
            failure_message: config.failure_message.clone(),
            variables: config.variables.clone(),
            dispatch: tracing::dispatcher::get_default(|current| current.clone()),
        }
    }

    /// Send this notifier's logs to `dispatch`
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Report the failure described by `event`.
    ///
    /// Returns `true` when the orchestration service accepted the report.
    /// Malformed events and rejected calls are logged and yield `false`.
    pub async fn notify(&self, event: &FailureEvent) -> bool {
        self.notify_logged(event)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    /// Parse a raw invocation payload and report it
    pub async fn notify_payload(&self, payload: Value) -> bool {
        let dispatch = self.dispatch.clone();

        async move {
            match FailureEvent::from_value(payload) {
                Ok(event) => self.notify_logged(&event).await,
                Err(err) => {
                    error!(error = %err, "Could not parse build failure event");
                    false
                }
            }
        }
        .with_subscriber(dispatch)
        .await
    }

    /// Report the failure and return what was delivered
    pub async fn dispatch(&self, event: &FailureEvent) -> Result<FailureReport> {
        self.deliver_event(event)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    /// Build the report for `event` without sending it
    pub fn classify(&self, event: &FailureEvent) -> Result<FailureReport> {
        tracing::dispatcher::with_default(&self.dispatch, || self.build_report(event))
    }

    fn build_report(&self, event: &FailureEvent) -> Result<FailureReport> {
        if !event.is_failed_build() {
            let status = event.build_status.clone().unwrap_or_default();
            return Err(NotifierError::UnexpectedBuildStatus(status));
        }

        let job_token = event.job_token(&self.variables)?;

        if !job_token.is_empty() {
            info!("Found a job token, failing the CodePipeline job");
            let log_link = event.log_link()?;
            return Ok(FailureReport::job_failure(
                job_token,
                self.failure_message.as_str(),
                log_link,
            ));
        }

        info!("Found no job token, stopping the pipeline execution");
        let execution_id = event.execution_id(&self.variables)?;
        let pipeline_name = event
            .pipeline_name(&self.variables)
            .inspect_err(|_| warn!(execution_id, "Execution id resolved but pipeline name is missing"))?;

        Ok(FailureReport::execution_stop(
            pipeline_name,
            execution_id,
            self.failure_message.as_str(),
        ))
    }

    async fn notify_logged(&self, event: &FailureEvent) -> bool {
        debug!(
            exported_variables = event.exported_variables.as_ref().map_or(0, Vec::len),
            environment_variables = event.environment_variables.as_ref().map_or(0, Vec::len),
            log_link = event.log_link.as_deref().unwrap_or_default(),
            build_status = event.build_status.as_deref().unwrap_or_default(),
            "Received build failure event"
        );

        match self.deliver_event(event).await {
            Ok(report) => {
                info!(
                    kind = %report.kind(),
                    link = report.link(),
                    "===FAILURE==="
                );
                true
            }
            Err(NotifierError::UnexpectedBuildStatus(status)) => {
                info!(build_status = %status, "Ignoring event for a build that did not fail");
                false
            }
            Err(err @ NotifierError::MalformedEvent { .. }) => {
                error!(error = %err, "Could not retrieve CodePipeline job details from event");
                false
            }
            Err(err) => {
                error!(
                    error = %err,
                    code = err.error_code().unwrap_or("unknown"),
                    "Failed to report build failure to CodePipeline"
                );
                false
            }
        }
    }

    async fn deliver_event(&self, event: &FailureEvent) -> Result<FailureReport> {
        let report = self.build_report(event)?;
        deliver(self.service.as_ref(), &report).await?;
        Ok(report)
    }
}

/// Issue the single orchestration call matching `report`
pub async fn deliver(service: &dyn OrchestrationService, report: &FailureReport) -> Result<()> {
    match report {
        FailureReport::JobFailure {
            job_token,
            message,
            external_execution_id,
        } => {
            service
                .report_job_failure(job_token, message, external_execution_id)
                .await
        }
        FailureReport::ExecutionStop {
            pipeline_name,
            execution_id,
            reason,
            abandon,
        } => {
            service
                .stop_execution(pipeline_name, execution_id, reason, *abandon)
                .await
        }
    }
}
